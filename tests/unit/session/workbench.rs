use super::*;
use crate::encode::sink::InMemoryEncoder;
use crate::raster::RasterImage;
use crate::session::cooperative::{CancellationToken, HostYield};
use crate::session::opts::RunOpts;

fn session(seed: u64) -> RunSession {
    let raster = RasterImage::new(
        2,
        2,
        vec![
            255, 0, 0, 255, 0, 0, 255, 255, //
            255, 0, 0, 255, 0, 0, 255, 255,
        ],
    )
    .unwrap();
    let opts = RunOpts {
        seed: Some(seed),
        ..Default::default()
    };
    RunSession::new(&raster, 2, opts).unwrap()
}

struct Probe<'a> {
    bench: &'a Workbench,
    saw_busy: bool,
}

impl HostYield for Probe<'_> {
    fn yield_to_host(&mut self) {
        if self.bench.is_busy() && matches!(self.bench.take_latest(), Err(ChromaError::Busy)) {
            self.saw_busy = true;
        }
    }
}

#[test]
fn run_stores_output_and_take_empties_the_slot() {
    let bench = Workbench::new();
    bench
        .run(
            session(1),
            &mut InMemoryEncoder::new(),
            &mut Cooperative::detached(),
            &mut |_| {},
        )
        .unwrap();

    let frames = bench.with_latest(|o| o.map(|o| o.frames.len())).unwrap();
    assert_eq!(frames, Some(2));
    assert!(bench.take_latest().unwrap().is_some());
    assert!(bench.take_latest().unwrap().is_none());
}

#[test]
fn slot_is_busy_while_a_run_is_active() {
    let bench = Workbench::new();
    let mut probe = Probe {
        bench: &bench,
        saw_busy: false,
    };
    {
        let mut coop = Cooperative::new(&mut probe, CancellationToken::new());
        bench
            .run(
                session(2),
                &mut InMemoryEncoder::new(),
                &mut coop,
                &mut |_| {},
            )
            .unwrap();
    }
    assert!(probe.saw_busy);
    assert!(!bench.is_busy());
}

#[test]
fn nested_run_fails_with_busy() {
    struct Nested<'a> {
        bench: &'a Workbench,
        result: Option<Result<(), RunFailure>>,
    }
    impl HostYield for Nested<'_> {
        fn yield_to_host(&mut self) {
            if self.result.is_none() {
                self.result = Some(self.bench.run(
                    session(3),
                    &mut InMemoryEncoder::new(),
                    &mut Cooperative::detached(),
                    &mut |_| {},
                ));
            }
        }
    }

    let bench = Workbench::new();
    let mut nested = Nested {
        bench: &bench,
        result: None,
    };
    {
        let mut coop = Cooperative::new(&mut nested, CancellationToken::new());
        bench
            .run(
                session(4),
                &mut InMemoryEncoder::new(),
                &mut coop,
                &mut |_| {},
            )
            .unwrap();
    }
    let inner = nested.result.take().unwrap().unwrap_err();
    assert!(matches!(inner.error, ChromaError::Busy));
    assert!(inner.frames.is_empty());
}

#[test]
fn failed_run_leaves_the_previous_output_released() {
    let bench = Workbench::new();
    bench
        .run(
            session(5),
            &mut InMemoryEncoder::new(),
            &mut Cooperative::detached(),
            &mut |_| {},
        )
        .unwrap();

    let failure = bench
        .run(
            session(6),
            &mut InMemoryEncoder::discarding(),
            &mut Cooperative::detached(),
            &mut |_| {},
        )
        .unwrap_err();
    assert!(matches!(failure.error, ChromaError::EmptyEncodeResult));
    assert_eq!(failure.frames.len(), 2);
    assert!(bench.take_latest().unwrap().is_none());
}
