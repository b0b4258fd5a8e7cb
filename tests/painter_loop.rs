// tests/painter_loop.rs
//! End-to-end tests of the painter loop running on its own thread.

mod support;

use painter::color::Color;
use painter::painter::{
    FramebufferFactory, LoopReport, Operation, PainterLoop, Point, QueueCapacity, QueueClosed,
    Rect,
};
use painter::script::{self, DecodeError};
use std::thread;
use support::{completion, test_config, FrameLog};
use test_log::test;

const CAPACITIES: [QueueCapacity; 2] = [QueueCapacity::Unbuffered, QueueCapacity::Bounded(8)];

/// Spawns a loop, submits `ops` from this thread, drains and returns the report.
fn run(capacity: QueueCapacity, frames: FrameLog, ops: Vec<Operation>) -> LoopReport {
    let config = test_config();
    let handle = PainterLoop::new(
        &config,
        FramebufferFactory::new(config.surface.max_pixels),
        frames,
    )
    .with_capacity(capacity)
    .spawn()
    .unwrap();

    assert_eq!(handle.submit(ops.clone()).unwrap(), ops.len());
    handle.finish().unwrap()
}

#[test]
fn frame_background_is_the_last_fill_before_commit() {
    for capacity in CAPACITIES {
        let frames = FrameLog::default();
        run(
            capacity,
            frames.clone(),
            vec![
                Operation::Fill(Color::opaque(0, 0x4f, 0)),
                Operation::Fill(Color::BLACK),
                Operation::Fill(Color::GREEN),
                Operation::Commit,
                Operation::Fill(Color::WHITE),
            ],
        );

        let frames = frames.take();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].surface.pixel(50, 50), Some(Color::GREEN));
    }
}

#[test]
fn default_state_survives_an_empty_session() {
    let report = run(QueueCapacity::Unbuffered, FrameLog::default(), Vec::new());
    assert_eq!(report.processed, 0);
    assert_eq!(report.state.background(), Color::WHITE);
    assert_eq!(report.state.background_rect(), None);
    assert!(report.state.figures().is_empty());
}

#[test]
fn figures_are_committed_in_insertion_order() {
    let frames = FrameLog::default();
    let report = run(
        QueueCapacity::Bounded(8),
        frames.clone(),
        vec![
            Operation::FigureAdd(Point::new(0.4, 0.6)),
            Operation::FigureAdd(Point::new(0.1, 0.2)),
            Operation::Commit,
        ],
    );

    assert_eq!(
        report.state.figures(),
        &[Point::new(0.4, 0.6), Point::new(0.1, 0.2)]
    );
    assert_eq!(frames.len(), 1);
}

#[test]
fn later_background_rect_replaces_earlier_one() {
    let report = run(
        QueueCapacity::Unbuffered,
        FrameLog::default(),
        vec![
            Operation::BackgroundRect(Rect::new(0.4, 0.3, 0.5, 0.7)),
            Operation::BackgroundRect(Rect::new(0.1, 0.1, 0.2, 0.3)),
        ],
    );
    assert_eq!(
        report.state.background_rect(),
        Some(Rect::new(0.1, 0.1, 0.2, 0.3))
    );
}

#[test]
fn move_depends_on_what_exists_when_it_is_applied() {
    let report = run(
        QueueCapacity::Unbuffered,
        FrameLog::default(),
        vec![
            Operation::FigureAdd(Point::new(0.4, 0.6)),
            Operation::FigureAdd(Point::new(0.1, 0.2)),
            Operation::MoveAll(Point::new(0.3, 0.1)),
        ],
    );
    assert_eq!(
        report.state.figures(),
        &[Point::new(0.3, 0.1), Point::new(0.3, 0.1)]
    );

    let report = run(
        QueueCapacity::Unbuffered,
        FrameLog::default(),
        vec![
            Operation::MoveAll(Point::new(0.3, 0.1)),
            Operation::FigureAdd(Point::new(0.4, 0.6)),
            Operation::FigureAdd(Point::new(0.1, 0.2)),
        ],
    );
    assert_eq!(
        report.state.figures(),
        &[Point::new(0.4, 0.6), Point::new(0.1, 0.2)]
    );
}

#[test]
fn mixed_sequence_in_chaotic_order() {
    let report = run(
        QueueCapacity::Bounded(8),
        FrameLog::default(),
        vec![
            Operation::FigureAdd(Point::new(0.4, 0.6)),
            Operation::BackgroundRect(Rect::new(0.4, 0.3, 0.5, 0.7)),
            Operation::MoveAll(Point::new(0.3, 0.1)),
            Operation::Fill(Color::BLACK),
            Operation::BackgroundRect(Rect::new(0.1, 0.1, 0.2, 0.3)),
            Operation::FigureAdd(Point::new(0.1, 0.2)),
            Operation::Fill(Color::GREEN),
        ],
    );

    assert_eq!(
        report.state.figures(),
        &[Point::new(0.3, 0.1), Point::new(0.1, 0.2)]
    );
    assert_eq!(
        report.state.background_rect(),
        Some(Rect::new(0.1, 0.1, 0.2, 0.3))
    );
    assert_eq!(report.state.background(), Color::GREEN);
}

#[test]
fn final_reset_wins_regardless_of_history() {
    let history = vec![
        Operation::FigureAdd(Point::new(0.4, 0.6)),
        Operation::FigureAdd(Point::new(0.1, 0.2)),
        Operation::BackgroundRect(Rect::new(0.4, 0.3, 0.5, 0.7)),
        Operation::MoveAll(Point::new(0.3, 0.1)),
        Operation::Fill(Color::GREEN),
        Operation::BackgroundRect(Rect::new(0.1, 0.1, 0.2, 0.3)),
        Operation::Fill(Color::BLACK),
    ];

    for rotation in 0..history.len() {
        let mut ops = history.clone();
        ops.rotate_left(rotation);
        ops.push(Operation::Reset);

        let report = run(QueueCapacity::Bounded(8), FrameLog::default(), ops);
        assert_eq!(report.state.background(), Color::BLACK);
        assert_eq!(report.state.background_rect(), None);
        assert!(report.state.figures().is_empty());
    }
}

#[test]
fn commit_sees_everything_before_it_and_nothing_after() {
    let frames = FrameLog::default();
    run(
        QueueCapacity::Unbuffered,
        frames.clone(),
        vec![
            Operation::Fill(Color::GREEN),
            Operation::BackgroundRect(Rect::new(0.0, 0.0, 0.5, 0.5)),
            Operation::Commit,
            Operation::Reset,
            Operation::Commit,
        ],
    );

    let frames = frames.take();
    assert_eq!(frames.len(), 2);
    assert_eq!(frames[0].surface.pixel(10, 10), Some(Color::BLACK));
    assert_eq!(frames[0].surface.pixel(75, 75), Some(Color::GREEN));
    assert_eq!(frames[1].surface.pixel(75, 75), Some(Color::BLACK));
}

#[test]
fn decoded_script_drives_the_loop() {
    let parsed = script::parse_str(
        "green\nbgrect 0.25 0.25 0.75 0.75\nfigure 0.5 0.5\nupdate\nsome wrong command\nupdate\n",
    );
    assert!(matches!(
        parsed.error.as_ref().and_then(|e| e.decode_error()),
        Some(DecodeError::UnknownCommand { .. })
    ));

    let frames = FrameLog::default();
    let report = run(QueueCapacity::Unbuffered, frames.clone(), parsed.operations);

    assert_eq!(report.processed, 4);
    let frames = frames.take();
    assert_eq!(frames.len(), 1);
    let frame = &frames[0].surface;
    assert_eq!(frame.pixel(5, 5), Some(Color::GREEN));
    assert_eq!(frame.pixel(30, 70), Some(Color::BLACK));
    assert_eq!(frame.pixel(50, 50), Some(Color::YELLOW));
}

#[test]
fn inverted_background_rect_is_still_painted() {
    let parsed = script::parse_str("white\nbgrect 0.75 0.75 0.25 0.25\nupdate\n");
    assert!(parsed.is_complete());

    let frames = FrameLog::default();
    run(QueueCapacity::Unbuffered, frames.clone(), parsed.operations);

    let frames = frames.take();
    assert_eq!(frames.len(), 1);
    let frame = &frames[0].surface;
    assert_eq!(frame.pixel(50, 50), Some(Color::BLACK));
    assert_eq!(frame.pixel(25, 25), Some(Color::BLACK));
    assert_eq!(frame.pixel(75, 75), Some(Color::WHITE));
    assert_eq!(frame.pixel(10, 10), Some(Color::WHITE));
}

#[test]
fn huge_figure_scale_does_not_kill_the_loop() {
    let mut config = test_config();
    config.figure.scale = 1.0e8;
    let frames = FrameLog::default();
    let handle = PainterLoop::new(
        &config,
        FramebufferFactory::new(config.surface.max_pixels),
        frames.clone(),
    )
    .spawn()
    .unwrap();

    handle
        .submit([
            Operation::Fill(Color::WHITE),
            Operation::FigureAdd(Point::new(0.5, 0.5)),
            Operation::Commit,
        ])
        .unwrap();
    let report = handle.finish().unwrap();

    assert_eq!(report.frames_delivered, 1);
    let frames = frames.take();
    assert_eq!(frames[0].surface.pixel(0, 0), Some(Color::YELLOW));
    assert_eq!(frames[0].surface.pixel(99, 99), Some(Color::YELLOW));
}

#[test]
fn concurrent_producers_keep_their_own_order() {
    const PRODUCERS: usize = 4;
    const PER_PRODUCER: usize = 50;

    for capacity in CAPACITIES {
        let config = test_config();
        let handle = PainterLoop::new(
            &config,
            FramebufferFactory::new(config.surface.max_pixels),
            FrameLog::default(),
        )
        .with_capacity(capacity)
        .spawn()
        .unwrap();

        let producers: Vec<_> = (0..PRODUCERS)
            .map(|p| {
                let sender = handle.sender().unwrap();
                thread::spawn(move || {
                    sender
                        .submit_all((0..PER_PRODUCER).map(|i| {
                            Operation::FigureAdd(Point::new(p as f32 / 10.0, i as f32 / 100.0))
                        }))
                        .unwrap()
                })
            })
            .collect();

        let submitted: usize = producers.into_iter().map(|p| p.join().unwrap()).sum();
        let report = handle.finish().unwrap();

        assert_eq!(submitted, PRODUCERS * PER_PRODUCER);
        assert_eq!(report.processed, (PRODUCERS * PER_PRODUCER) as u64);

        for p in 0..PRODUCERS {
            let ys: Vec<f32> = report
                .state
                .figures()
                .iter()
                .filter(|figure| figure.x == p as f32 / 10.0)
                .map(|figure| figure.y)
                .collect();
            let expected: Vec<f32> = (0..PER_PRODUCER).map(|i| i as f32 / 100.0).collect();
            assert_eq!(ys, expected, "producer {} out of order", p);
        }
    }
}

#[test]
fn completion_hook_allows_flushing_without_stopping() {
    let config = test_config();
    let frames = FrameLog::default();
    let (observer, mut done) = completion();
    let handle = PainterLoop::new(
        &config,
        FramebufferFactory::new(config.surface.max_pixels),
        frames.clone(),
    )
    .with_capacity(QueueCapacity::Bounded(4))
    .with_observer(observer)
    .spawn()
    .unwrap();

    handle
        .submit([Operation::Fill(Color::GREEN), Operation::Commit])
        .unwrap();
    done.wait_for(2);
    assert_eq!(frames.len(), 1);

    handle.submit([Operation::Commit]).unwrap();
    done.wait_for(3);
    assert_eq!(frames.len(), 2);

    handle.shutdown().unwrap();
}

#[test]
fn failed_allocations_do_not_stop_the_loop() {
    let mut config = test_config();
    config.surface.max_pixels = 10;
    let frames = FrameLog::default();
    let handle = PainterLoop::new(
        &config,
        FramebufferFactory::new(config.surface.max_pixels),
        frames.clone(),
    )
    .spawn()
    .unwrap();

    handle
        .submit([
            Operation::Commit,
            Operation::FigureAdd(Point::new(0.5, 0.5)),
            Operation::Commit,
        ])
        .unwrap();
    let report = handle.finish().unwrap();

    assert_eq!(report.processed, 3);
    assert_eq!(report.failed_commits, 2);
    assert_eq!(report.frames_delivered, 0);
    assert_eq!(report.state.figures(), &[Point::new(0.5, 0.5)]);
    assert_eq!(frames.failures(), vec![0, 1]);
}

#[test]
fn shutdown_unblocks_waiting_producers() {
    let config = test_config();
    let (observer, mut done) = completion();
    let handle = PainterLoop::new(
        &config,
        FramebufferFactory::new(config.surface.max_pixels),
        FrameLog::default(),
    )
    .with_capacity(QueueCapacity::Unbuffered)
    .with_observer(observer)
    .spawn()
    .unwrap();

    let sender = handle.sender().unwrap();
    let late_sender = sender.clone();
    let producer = thread::spawn(move || {
        let mut accepted = 0u64;
        while sender.submit(Operation::Fill(Color::GREEN)).is_ok() {
            accepted += 1;
        }
        accepted
    });

    done.wait_for(10);
    let report = handle.shutdown().unwrap();
    let accepted = producer.join().unwrap();

    assert!(report.processed >= 10);
    assert!(report.processed <= accepted);
    assert_eq!(late_sender.submit(Operation::Reset), Err(QueueClosed));
}

#[test]
fn dropping_the_handle_stops_the_loop() {
    let config = test_config();
    let handle = PainterLoop::new(
        &config,
        FramebufferFactory::new(config.surface.max_pixels),
        FrameLog::default(),
    )
    .spawn()
    .unwrap();
    let sender = handle.sender().unwrap();

    drop(handle);
    assert_eq!(sender.submit(Operation::Commit), Err(QueueClosed));
}
