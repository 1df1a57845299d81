use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};

use tle_astrometry::{
    ref_system::of_date_to_j2000, ElementSet, GeneratorConfig, ObservationGenerator, SamplingRun,
    VecSink,
};

const VANGUARD: (&str, &str) = (
    "1 00005U 58002B   00179.78495062  .00000023  00000-0  28098-4 0  4753",
    "2 00005  34.2682 348.7242 1859667 331.7664  19.3264 10.82419157413667",
);

const MOLNIYA: (&str, &str) = (
    "1 08195U 75081A   06176.33215444  .00000099  00000-0  11873-3 0   813",
    "2 08195  64.1586 279.0717 6877146 264.7651  20.2257  2.00491383225656",
);

fn bench_parse(c: &mut Criterion) {
    c.bench_function("element_set/from_tle", |b| {
        b.iter(|| ElementSet::from_tle(black_box(VANGUARD.0), black_box(VANGUARD.1)).unwrap())
    });
}

/// One full sampling run (100 points) per regime, initialization included.
fn bench_sampling_run(c: &mut Criterion) {
    let config = GeneratorConfig::default();
    for (name, (line1, line2)) in [("near_earth", VANGUARD), ("deep_space", MOLNIYA)] {
        let element_set = ElementSet::from_tle(line1, line2).unwrap();
        c.bench_function(&format!("sampling_run/{name}"), |b| {
            b.iter_batched(
                || element_set.clone(),
                |set| {
                    for sample in SamplingRun::start(set, &config).unwrap() {
                        black_box(sample.record);
                    }
                },
                BatchSize::SmallInput,
            )
        });
    }
}

fn bench_precession(c: &mut Criterion) {
    // Deterministic grid over the sky and over a century of dates
    let cases = (0..1000)
        .map(|i| {
            let i = i as f64;
            (2433282.5 + i * 36.525, (i * 0.377) % 6.283, ((i * 0.113) % 3.1) - 1.55)
        })
        .collect::<Vec<_>>();

    c.bench_function("ref_system/of_date_to_j2000", |b| {
        b.iter(|| {
            for &(jd, ra, dec) in &cases {
                let (mut ra, mut dec) = (ra, dec);
                of_date_to_j2000(black_box(jd), &mut ra, &mut dec);
                black_box((ra, dec));
            }
        })
    });
}

fn bench_generator(c: &mut Criterion) {
    let text = format!(
        "VANGUARD 1\n{}\n{}\nMOLNIYA 1-29\n{}\n{}\n",
        VANGUARD.0, VANGUARD.1, MOLNIYA.0, MOLNIYA.1
    );
    let generator = ObservationGenerator::new(GeneratorConfig::default()).unwrap();

    c.bench_function("generator/process_str", |b| {
        b.iter(|| {
            let mut sink = VecSink::default();
            generator.process_str(black_box(&text), &mut sink).unwrap();
            black_box(sink.records.len())
        })
    });
}

criterion_group!(
    benches,
    bench_parse,
    bench_sampling_run,
    bench_precession,
    bench_generator
);
criterion_main!(benches);
