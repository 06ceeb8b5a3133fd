//! Validates the code examples from README.md compile and behave correctly.

#[test]
fn readme_core_api() {
    use camwb::{CorrectionError, correct_bulk, correct_pixel};

    assert_eq!(correct_pixel([10, 20, 30]), [13, 13, 49]);

    let raw = [10u8, 20, 30].repeat(8);
    let mut out = vec![0u8; raw.len()];
    correct_bulk(&raw, &mut out).unwrap();
    assert_eq!(&out[..3], &[13, 13, 49]);

    let mut odd = vec![0u8; 25];
    assert_eq!(
        correct_bulk(&[0u8; 25], &mut odd),
        Err(CorrectionError::InvalidLength)
    );
}

#[test]
fn readme_white_balancer() {
    use camwb::{FrameGeometry, WhiteBalancer};

    let geometry = FrameGeometry::new(640, 480).unwrap();
    let wb = WhiteBalancer::new(geometry);
    let mut frame = vec![128u8; geometry.byte_len()];
    wb.white_balance_inplace(&mut frame).unwrap();
    assert_eq!(&frame[..3], &camwb::correct_pixel([128, 128, 128]));
}

#[test]
fn readme_strided() {
    use camwb::correct_inplace_strided;

    let mut buf = vec![0u8; 256 * 100];
    correct_inplace_strided(&mut buf, 80, 100, 256).unwrap();
}

#[cfg(feature = "rgb")]
#[test]
fn readme_typed_rgb() {
    use camwb::typed_rgb;
    use rgb::Rgb;

    let mut pixels: Vec<Rgb<u8>> = vec![Rgb::new(10, 20, 30); 100];
    typed_rgb::correct_rgb_mut(&mut pixels);
    assert_eq!(pixels[99], Rgb::new(13, 13, 49));
}

#[cfg(feature = "imgref")]
#[test]
fn readme_imgref() {
    use ::imgref::ImgVec;
    use camwb::imgref;
    use rgb::Rgb;

    let img = ImgVec::new(vec![Rgb::new(10u8, 20, 30); 640 * 480], 640, 480);
    let img = imgref::white_balance_imgvec(img).unwrap();
    assert_eq!(img.width(), 640);
    assert_eq!(img.buf()[0], Rgb::new(13, 13, 49));
}
