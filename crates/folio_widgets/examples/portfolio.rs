//! Portfolio Demo - Headless Interaction Walkthrough
//!
//! Drives the full interaction layer without a renderer:
//! - SectionTracker follows a simulated scroll session
//! - ProjectModal hosts a three-slide slider
//! - Keyboard, touch-swipe, and fullscreen flows
//! - Teardown leaves the listener registry empty
//!
//! Run with: cargo run -p folio_widgets --example portfolio

use folio_widgets::prelude::*;

const FRAME: f32 = 1.0 / 60.0;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::DEBUG.into()),
        )
        .init();

    let mut ctx = WidgetContext::new();

    // Page layout: four stacked sections inside a 900px viewport.
    let sections = vec![
        Section::new("hero", 0.0, 900.0),
        Section::new("about", 900.0, 700.0),
        Section::new("projects", 1600.0, 1200.0),
        Section::new("contact", 2800.0, 400.0),
    ];
    let mut tracker = SectionTracker::new(&mut ctx, sections);
    tracker.on_change(&ctx, |active| match active {
        Some(id) => println!("nav highlight -> {id}"),
        None => println!("nav highlight cleared"),
    });

    // Scroll through the page; each event is one observed scroll frame.
    tracker.handle_event(&mut ctx, &Event::resize(1280.0, 900.0));
    for scroll_top in [0.0, 400.0, 1000.0, 1800.0, 2600.0] {
        tracker.handle_event(&mut ctx, &Event::scroll(0.0, scroll_top));
    }

    // Open a project with a screenshot gallery.
    let project = ProjectDetail::new("Folio", "This site, recursively")
        .tag("rust")
        .tag("wasm")
        .link("https://example.com/folio")
        .image(ImageRef::new("folio_1.png", "Landing page"))
        .image(ImageRef::new("folio_2.png", "Project grid"))
        .image(ImageRef::new("folio_3.png", "Detail modal"));
    let mut modal = ProjectModal::open(&mut ctx, project);

    // Advance with the right arrow, waiting out each transition window.
    modal.handle_event(
        &mut ctx,
        &mut Event::key(event_types::KEY_DOWN, KeyCode::RIGHT, Modifiers::none()),
    );
    settle(&mut modal, &mut ctx);
    print_slider(&modal, &ctx);

    // Swipe left (start right of end) for one more advance.
    modal.handle_event(&mut ctx, &mut Event::touch(event_types::TOUCH_START, 300.0, 400.0));
    modal.handle_event(&mut ctx, &mut Event::touch(event_types::TOUCH_MOVE, 180.0, 400.0));
    modal.handle_event(&mut ctx, &mut Event::new(event_types::TOUCH_END));
    settle(&mut modal, &mut ctx);
    print_slider(&modal, &ctx);

    // Fullscreen the visible slide, then dismiss it with a click. The
    // overlay consumes the click, so the modal behind it stays open.
    if let Some(mut overlay) = modal.slider().and_then(|s| s.open_fullscreen(&mut ctx)) {
        println!("fullscreen: {}", overlay.image().src);
        let mut click = Event::new(event_types::POINTER_UP);
        overlay.handle_event(&mut ctx, &mut click);
        modal.handle_event(&mut ctx, &mut click);
        println!("modal still open: {}", modal.is_open(&ctx));
    }

    // Escape closes the modal and unwinds every listener it brought.
    modal.handle_event(
        &mut ctx,
        &mut Event::key(event_types::KEY_DOWN, KeyCode::ESCAPE, Modifiers::none()),
    );
    tracker.unmount(&mut ctx);

    for (name, event_type) in [
        ("key_down", event_types::KEY_DOWN),
        ("pointer_up", event_types::POINTER_UP),
        ("touch_start", event_types::TOUCH_START),
        ("scroll", event_types::SCROLL),
    ] {
        println!("{name} listeners after teardown: {}", ctx.listener_count(event_type));
    }
}

/// Run frames until the slider's transition window has elapsed
fn settle(modal: &mut ProjectModal, ctx: &mut WidgetContext) {
    for _ in 0..40 {
        modal.update(ctx, FRAME);
    }
}

fn print_slider(modal: &ProjectModal, ctx: &WidgetContext) {
    if let Some(view) = modal.slider().and_then(|s| s.view(ctx)) {
        println!(
            "slider {} offset {}% prev={} next={}",
            view.counter, view.track_offset_pct, view.prev_enabled, view.next_enabled
        );
    }
}
