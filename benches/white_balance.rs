use archmage::SimdToken;
use camwb::{CorrectionError, FrameGeometry, WhiteBalancer};
use criterion::{BenchmarkGroup, Criterion, Throughput, measurement::WallTime};

// === SIMD tier detection ===

fn probe<T: SimdToken>() -> &'static str {
    if T::summon().is_some() {
        "available"
    } else {
        "not available"
    }
}

fn print_simd_info() {
    eprintln!("=== SIMD Tier Detection ===");
    #[cfg(target_arch = "x86_64")]
    eprintln!(
        "  AVX2+FMA (x86-64-v3):    {}",
        probe::<archmage::X64V3Token>()
    );
    #[cfg(target_arch = "aarch64")]
    eprintln!(
        "  Arm64-v2:                {}",
        probe::<archmage::Arm64V2Token>()
    );
    #[cfg(target_arch = "wasm32")]
    eprintln!(
        "  WASM SIMD128:            {}",
        probe::<archmage::Wasm128Token>()
    );
    eprintln!("  Scalar:                  always available");
    eprintln!("  Selected backend:        {}", camwb::Backend::detect());
    eprintln!("===========================");
}

// === Scalar disable/enable via archmage ===

fn disable_all_simd() {
    let _ = archmage::dangerously_disable_tokens_except_wasm(true);
}

fn enable_all_simd() {
    let _ = archmage::dangerously_disable_tokens_except_wasm(false);
}

// === Naive baseline ===

fn naive_correct(src: &[u8], dst: &mut [u8]) {
    for (s, d) in src.chunks_exact(3).zip(dst.chunks_exact_mut(3)) {
        let [s0, s1, s2] = [s[0], s[1], s[2]].map(f64::from);
        let d0 = -0.636 * s0 - 0.369 * s1 + 2.092 * s2;
        let d1 = 0.162 * s0 + 1.315 * s1 - 0.495 * s2;
        let d2 = 3.017 * s0 - 0.664 * s1 - 0.139 * s2;
        d[0] = d2.clamp(0.0, 255.0).round() as u8;
        d[1] = d1.clamp(0.0, 255.0).round() as u8;
        d[2] = d0.clamp(0.0, 255.0).round() as u8;
    }
}

fn fixed_correct(src: &[u8], dst: &mut [u8]) {
    for (s, d) in src.chunks_exact(3).zip(dst.chunks_exact_mut(3)) {
        d.copy_from_slice(&camwb::correct_pixel_fixed([s[0], s[1], s[2]]));
    }
}

// === Benchmark helpers ===

const W: usize = 1920;
const H: usize = 1080;

/// Benchmark a copy operation with 3 variants: camwb (best SIMD), camwb_scalar, naive.
fn bench_copy(
    group: &mut BenchmarkGroup<WallTime>,
    camwb_fn: fn(&[u8], &mut [u8]) -> Result<(), CorrectionError>,
    naive_fn: fn(&[u8], &mut [u8]),
    src: &[u8],
) {
    group.bench_function("camwb", |b| {
        let mut dst = vec![0u8; src.len()];
        b.iter(|| camwb_fn(src, &mut dst).unwrap());
    });

    disable_all_simd();
    group.bench_function("camwb_scalar", |b| {
        let mut dst = vec![0u8; src.len()];
        b.iter(|| camwb_fn(src, &mut dst).unwrap());
    });
    enable_all_simd();

    group.bench_function("naive", |b| {
        let mut dst = vec![0u8; src.len()];
        b.iter(|| naive_fn(src, &mut dst));
    });
}

fn frame() -> Vec<u8> {
    (0..W * H * 3).map(|i| (i % 251) as u8).collect()
}

// === Benchmark groups ===

fn bench_bulk(c: &mut Criterion) {
    let mut group = c.benchmark_group("bulk_copy");
    let src = frame();
    group.throughput(Throughput::Bytes(src.len() as u64));
    bench_copy(&mut group, camwb::correct_bulk, naive_correct, &src);
    group.bench_function("fixed_point", |b| {
        let mut dst = vec![0u8; src.len()];
        b.iter(|| fixed_correct(&src, &mut dst));
    });
    group.finish();
}

fn bench_bulk_inplace(c: &mut Criterion) {
    let mut group = c.benchmark_group("bulk_inplace");
    let buf = frame();
    group.throughput(Throughput::Bytes(buf.len() as u64));
    group.bench_function("camwb", |b| {
        let mut v = buf.clone();
        b.iter(|| camwb::correct_bulk_inplace(&mut v).unwrap());
    });
    group.finish();
}

fn bench_balancer(c: &mut Criterion) {
    let mut group = c.benchmark_group("white_balancer");
    let src = frame();
    group.throughput(Throughput::Bytes(src.len() as u64));
    let geometry = FrameGeometry::new(W, H).unwrap();
    for (name, wb) in [
        ("detected", WhiteBalancer::new(geometry)),
        ("forced_scalar", WhiteBalancer::force_scalar(geometry)),
    ] {
        group.bench_function(name, |b| {
            let mut dst = vec![0u8; src.len()];
            b.iter(|| wb.white_balance(&src, &mut dst).unwrap());
        });
    }
    group.finish();
}

fn main() {
    print_simd_info();

    let mut criterion = Criterion::default().configure_from_args();
    bench_bulk(&mut criterion);
    bench_bulk_inplace(&mut criterion);
    bench_balancer(&mut criterion);
    criterion.final_summary();
}
