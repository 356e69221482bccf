use rand::prelude::*;
use rand_xoshiro::Xoshiro128StarStar;
use std::f32::consts::{FRAC_PI_2, TAU};

use uac2_mic::{pack_frame, samples_for_tick, FrameScheduler, Gain, SampleFormat, SineOscillator};

mod util;
use util::*;

const SEED: u64 = 4711;

#[test]
fn distribution_law() {
    let mut rng = Xoshiro128StarStar::seed_from_u64(SEED);
    let rates =
        [8_000, 11_025, 16_000, 22_050, 32_000, 44_100, 48_000, 88_200, 96_000, 176_400, 192_000, 1, 999, 1_001];

    for rate in rates.into_iter().chain((0..200).map(|_| rng.random_range(1..=192_000u32))) {
        let mut frac = 0;
        let total: u32 = (0..1000).map(|_| samples_for_tick(rate, &mut frac)).sum();
        assert_eq!(total, rate, "rate {rate}");
        assert_eq!(frac, 0, "rate {rate}");
    }
}

#[test]
fn accumulator_stays_below_one_thousand() {
    let mut frac = 0;
    for _ in 0..5_000 {
        let count = samples_for_tick(44_100, &mut frac);
        assert!(count == 44 || count == 45);
        assert!(frac < 1000);
    }
}

#[test]
fn out_of_range_accumulator_is_reduced() {
    let mut frac = u16::MAX;
    assert_eq!(samples_for_tick(44_100, &mut frac), 44);
    assert_eq!(frac, 635);

    let mut frac = 1_999;
    assert_eq!(samples_for_tick(1_001, &mut frac), 2);
    assert_eq!(frac, 0);
}

#[test]
fn sample_counts_at_44k1() {
    let mut scheduler = FrameScheduler::new();
    let counts: Vec<usize> = (0..20).map(|_| scheduler.next_tick(44_100)).collect();

    let mut expected = vec![44; 20];
    expected[9] = 45;
    expected[19] = 45;
    assert_eq!(counts, expected);
}

/// Every prefix of `k` ticks carries `floor(k * rate / 1000)` samples, also
/// directly after the rate changed.
#[test]
fn rate_change_resets_accumulator() {
    let mut scheduler = FrameScheduler::new();
    scheduler.next_tick(48_500);
    assert_eq!(scheduler.fraction(), 500);

    let rate = 44_100u32;
    let mut total = 0;
    for k in 1..=1000u64 {
        total += scheduler.next_tick(rate) as u64;
        assert_eq!(total, k * u64::from(rate) / 1000, "prefix of {k} ticks");
    }
    assert_eq!(total, 44_100);
}

#[test]
fn same_rate_keeps_accumulator() {
    let mut scheduler = FrameScheduler::new();
    for _ in 0..3 {
        scheduler.next_tick(44_100);
    }
    assert_eq!(scheduler.fraction(), 300);
    scheduler.next_tick(44_100);
    assert_eq!(scheduler.fraction(), 400);

    scheduler.reset();
    assert_eq!(scheduler.fraction(), 0);
}

#[test]
fn oscillator_phase_wraps() {
    let mut osc = SineOscillator::new(440.0);
    assert_eq!(osc.frequency_hz(), 440.0);

    for _ in 0..100_000 {
        let value = osc.next_sample(44_100);
        assert!((-1.0..=1.0).contains(&value));
        assert!((0.0..TAU).contains(&osc.phase()));
    }
}

#[test]
fn oscillator_follows_sine() {
    // a quarter period per sample
    let mut osc = SineOscillator::new(1_000.0);
    let samples: Vec<f32> = osc.samples(4_000).take(8).collect();
    let expected = [0.0, 1.0, 0.0, -1.0, 0.0, 1.0, 0.0, -1.0];
    for (sample, expected) in samples.iter().zip(expected) {
        assert!((sample - expected).abs() < 1e-4, "{samples:?}");
    }

    osc.reset();
    assert_eq!(osc.phase(), 0.0);
    osc.next_sample(4_000);
    assert!((osc.phase() - FRAC_PI_2).abs() < 1e-6);
}

#[test]
fn oscillator_is_continuous_across_frames() {
    let mut whole = SineOscillator::new(440.0);
    let expected: Vec<f32> = whole.samples(48_000).take(480).collect();

    let mut split = SineOscillator::new(440.0);
    let mut actual = Vec::new();
    for _ in 0..10 {
        actual.extend(split.samples(48_000).take(48));
    }
    assert_eq!(actual, expected);
}

#[test]
fn gain() {
    assert_eq!(Gain::new(0.5, 0, false).factor(), 0.5);
    assert_eq!(Gain::new(0.5, -1536, true), Gain::MUTE);
    assert!((Gain::new(0.5, -1536, false).factor() - 0.250_594).abs() < 1e-5);
    assert!((Gain::db_to_linear(-20 * 256) - 0.1).abs() < 1e-6);
    assert_eq!(Gain::new(1.0, 0, false).apply(0.25), 0.25);
}

#[test]
fn pack_16bit() {
    let mut out = [0u8; 2];

    SampleFormat::S16Le.pack(1.0, &mut out);
    assert_eq!(out, 32767i16.to_le_bytes());
    SampleFormat::S16Le.pack(-1.0, &mut out);
    assert_eq!(out, (-32767i16).to_le_bytes());
    SampleFormat::S16Le.pack(0.5, &mut out);
    assert_eq!(out, 16384i16.to_le_bytes());
    SampleFormat::S16Le.pack(2.0, &mut out);
    assert_eq!(out, 32767i16.to_le_bytes());
}

#[test]
fn pack_24bit() {
    let mut out = [0u8; 3];

    SampleFormat::S24Le.pack(1.0, &mut out);
    assert_eq!(out, [0xff, 0xff, 0x7f]);
    SampleFormat::S24Le.pack(-1.0, &mut out);
    assert_eq!(out, [0x01, 0x00, 0x80]);
    SampleFormat::S24Le.pack(0.0, &mut out);
    assert_eq!(out, [0, 0, 0]);
    SampleFormat::S24Le.pack(-0.5, &mut out);
    assert_eq!(decode(SampleFormat::S24Le, &out), [-4_194_304]);
}

#[test]
fn packing_is_within_one_step() {
    let mut rng = Xoshiro128StarStar::seed_from_u64(SEED);

    for format in [SampleFormat::S16Le, SampleFormat::S24Le] {
        let step = 1.0 / format.full_scale() as f32;
        let mut out = [0u8; 3];
        let out = &mut out[..format.bytes_per_sample()];

        for _ in 0..10_000 {
            let value: f32 = rng.random_range(-1.0..=1.0);
            format.pack(value, out);
            let restored = decode(format, out)[0] as f32 / format.full_scale() as f32;
            assert!((restored - value).abs() <= step, "{format:?}: {value} -> {restored}");
        }
    }
}

#[test]
fn pack_frame_fills_exactly() {
    let mut out = [0xaau8; 12];
    let samples = [0.5, -0.5, 1.0].into_iter().cycle();
    let written = pack_frame(SampleFormat::S24Le, Gain::new(1.0, 0, false), samples, &mut out[..9]);
    assert_eq!(written, 9);
    assert_eq!(decode(SampleFormat::S24Le, &out[..9]), [4_194_304, -4_194_304, 8_388_607]);
    assert_eq!(out[9..], [0xaa; 3]);

    let written = pack_frame(SampleFormat::S16Le, Gain::MUTE, [1.0; 2], &mut out);
    assert_eq!(written, 4);
    assert_eq!(out[..4], [0; 4]);
}

#[test]
fn pack_frame_consumes_one_sample_per_slot() {
    let mut osc = SineOscillator::new(440.0);
    let mut reference = osc.clone();
    let mut out = [0u8; 44 * 2];

    pack_frame(SampleFormat::S16Le, Gain::new(0.5, 0, false), osc.samples(44_100), &mut out);
    for _ in 0..44 {
        reference.next_sample(44_100);
    }
    assert_eq!(osc.phase(), reference.phase());
}

#[test]
fn format_properties() {
    assert_eq!(SampleFormat::S16Le.bits(), 16);
    assert_eq!(SampleFormat::S24Le.bits(), 24);
    assert_eq!(SampleFormat::S16Le.full_scale(), 32767);
    assert_eq!(SampleFormat::S24Le.full_scale(), 8_388_607);
}
