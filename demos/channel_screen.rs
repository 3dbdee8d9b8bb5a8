//! Channel Screen Example - call banners and a collapsing header
//!
//! Walks a channel screen through a few store updates and scroll positions,
//! printing what the screen would render.
//!
//! Run with: cargo run --example channel_screen

use spark_channel_view::{
    CallStateComposer, CallStateSnapshot, CallsByChannel, CurrentCall, HeaderGeometryEngine,
    HeaderMetrics, MemorySources, Platform, on_change,
};
use spark_signals::batch;

const SERVER: &str = "https://chat.example.com";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== spark-channel-view Channel Screen Example ===\n");

    // -------------------------------------------------------------------------
    // Call banners
    // -------------------------------------------------------------------------

    let sources = MemorySources::new("me");
    let composer = CallStateComposer::new(&sources, SERVER);

    let _banner = on_change(composer.show_join_call_banner(), |value| {
        println!("  [banner] -> {value:?}")
    });

    println!("Open town-square, a call is running there:");
    sources.apply(CallStateSnapshot {
        current_channel_id: Some("town-square".into()),
        channels_with_calls: CallsByChannel::new().with("town-square", true),
        ..CallStateSnapshot::new(SERVER, "me")
    });
    println!("  {:?}", composer.outputs());

    println!("\nJoin the call:");
    sources.set_current_call(Some(CurrentCall::new(SERVER, "town-square", true)));
    println!("  {:?}", composer.outputs());

    println!("\nLeave the call and dismiss the banner:");
    batch(|| {
        sources.set_current_call(None);
        sources.set_dismissed(SERVER, "town-square".into(), true);
    });
    println!("  {:?}", composer.outputs());
    println!("  changed: {:?}", composer.take_changes());

    // -------------------------------------------------------------------------
    // Header geometry
    // -------------------------------------------------------------------------

    println!("\n--- Header ---\n");

    let engine = HeaderGeometryEngine::new(HeaderMetrics::for_platform(Platform::Ios, true), true)?;
    let watch = engine.watch(|g| {
        println!(
            "  height={:>6.1} translate_y={:>6.1} search_top={:>6.1} offset={:>5.1}",
            g.container_height.height, g.translate_y, g.search_top_margin, g.height_offset
        );
    });

    for scroll in [-40.0, 0.0, 30.0, 200.0] {
        engine.set_scroll(scroll);
    }

    println!("\nLock while the search field is focused:");
    engine.lock(engine.config().header_offset);
    engine.unlock();

    watch.stop();
    println!("\nDone.");
    Ok(())
}
