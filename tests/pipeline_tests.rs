//! End-to-end tests: script text through the parser, the queue and the event
//! loop, checked on the frames the receiver sees.

use painter::canvas::{Framebuffer, FramebufferFactory};
use painter::color::Rgba;
use painter::config::Config;
use painter::lang::{parse_str, ParseError};
use painter::output::PngFrameWriter;
use painter::pipeline::{EventLoop, Operation, Receiver};
use std::sync::{Arc, Mutex};
use std::thread;

fn config(width: u32, height: u32) -> Config {
    let mut config = Config::default();
    config.canvas.width = width;
    config.canvas.height = height;
    config
}

type Frames = Arc<Mutex<Vec<Framebuffer>>>;

fn start_capturing(config: &Config) -> (EventLoop, Frames) {
    let frames: Frames = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&frames);
    let event_loop = EventLoop::start(
        FramebufferFactory,
        move |fb: &Framebuffer| sink.lock().unwrap().push(fb.clone()),
        config,
    )
    .unwrap();
    (event_loop, frames)
}

#[test_log::test]
fn script_renders_background_and_figure() {
    let (mut event_loop, frames) = start_capturing(&config(800, 800));

    let ops = parse_str("green\nfigure 0.25 0.25\nmove 0.25 0.25\nupdate").unwrap();
    assert_eq!(ops.len(), 3);
    event_loop.post_all(ops);
    event_loop.stop_and_wait().unwrap();

    let frames = frames.lock().unwrap();
    assert_eq!(frames.len(), 1);
    let frame = &frames[0];
    assert_eq!(frame.pixel(400, 400), Some(Rgba::YELLOW));
    assert_eq!(frame.pixel(10, 10), Some(Rgba::GREEN));
    assert_eq!(frame.pixel(790, 790), Some(Rgba::GREEN));
}

#[test_log::test]
fn bgrect_alone_is_black_on_fresh_canvas() {
    let (mut event_loop, frames) = start_capturing(&config(100, 100));

    event_loop.post_all(parse_str("white\nupdate").unwrap());
    // Next session lands on the other buffer, which has never been drawn.
    event_loop.post_all(parse_str("bgrect 0.5 0.5 1 1\nupdate").unwrap());
    event_loop.stop_and_wait().unwrap();

    let frames = frames.lock().unwrap();
    assert_eq!(frames.len(), 2);
    assert!(frames[0].is_uniform(Rgba::WHITE));
    assert_eq!(frames[1].pixel(75, 75), Some(Rgba::BLACK));
    assert_eq!(frames[1].pixel(10, 10), Some(Rgba::TRANSPARENT));
}

#[test_log::test]
fn reset_session_paints_black_before_figures() {
    let (mut event_loop, frames) = start_capturing(&config(800, 800));

    let ops = parse_str("white\nfigure 0.1 0.1\nreset\nfigure 0.5 0.5\nupdate").unwrap();
    assert_eq!(ops[0], Operation::Reset);
    event_loop.post_all(ops);
    event_loop.stop_and_wait().unwrap();

    let frames = frames.lock().unwrap();
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].pixel(5, 5), Some(Rgba::BLACK));
    assert_eq!(frames[0].pixel(400, 400), Some(Rgba::YELLOW));
}

#[test_log::test]
fn session_without_update_delivers_nothing() {
    let (mut event_loop, frames) = start_capturing(&config(32, 32));
    event_loop.post_all(parse_str("white\nfigure 0.5 0.5").unwrap());
    let stats = event_loop.stop_and_wait().unwrap();
    assert_eq!(stats.operations_applied, 2);
    assert_eq!(stats.frames_delivered, 0);
    assert!(frames.lock().unwrap().is_empty());
}

#[test_log::test]
fn sessions_from_many_producers_each_produce_a_frame() {
    let (mut event_loop, frames) = start_capturing(&config(32, 32));

    let producers: Vec<_> = ["white\nupdate", "green\nupdate", "reset\nupdate"]
        .into_iter()
        .map(|script| {
            let poster = event_loop.poster();
            thread::spawn(move || poster.post_all(parse_str(script).unwrap()))
        })
        .collect();
    for handle in producers {
        handle.join().unwrap();
    }
    event_loop.stop_and_wait().unwrap();

    let frames = frames.lock().unwrap();
    assert_eq!(frames.len(), 3);
    let mut seen: Vec<Rgba> = frames
        .iter()
        .map(|f| f.pixel(0, 0).unwrap())
        .collect();
    seen.sort_by_key(|c| c.to_bytes());
    let mut expected = vec![Rgba::WHITE, Rgba::GREEN, Rgba::BLACK];
    expected.sort_by_key(|c| c.to_bytes());
    assert_eq!(seen, expected);
    assert!(frames.iter().all(|f| f.is_uniform(f.pixel(0, 0).unwrap())));
}

#[test_log::test]
fn malformed_script_posts_nothing() {
    let (mut event_loop, frames) = start_capturing(&config(32, 32));
    match parse_str("white\nupdate\nfigure 0.5") {
        Ok(ops) => event_loop.post_all(ops),
        Err(e) => assert!(matches!(e, ParseError::ArgumentCount { line: 3, .. })),
    }
    let stats = event_loop.stop_and_wait().unwrap();
    assert_eq!(stats.operations_applied, 0);
    assert!(frames.lock().unwrap().is_empty());
}

#[test_log::test]
fn png_writer_writes_numbered_frames() {
    let dir = std::env::temp_dir().join(format!("painter-png-test-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);

    let mut writer = PngFrameWriter::new(&dir).unwrap();
    let mut fb = Framebuffer::new(4, 3);
    painter::canvas::Canvas::fill(
        &mut fb,
        painter::canvas::Rect::from_size(4, 3),
        Rgba::GREEN,
        painter::canvas::FillMode::Src,
    );
    writer.on_frame(&fb);
    writer.on_frame(&fb);

    for index in 0..2 {
        let bytes = std::fs::read(writer.frame_path(index)).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }
    std::fs::remove_dir_all(&dir).unwrap();
}
