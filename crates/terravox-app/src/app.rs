//! `SimApp` trait definition.

use crate::context::AppContext;

/// Trait for headless Terravox applications.
///
/// The runner owns the loop: it initialises logging, calls [`SimApp::init`]
/// once, then [`SimApp::update`] once per fixed tick until the tick limit is
/// reached or [`SimApp::should_exit`] returns true.
pub trait SimApp: Sized {
    /// Initialize the application.
    fn init(ctx: &mut AppContext) -> anyhow::Result<Self>;

    /// Advance the simulation by one tick of `dt` seconds.
    fn update(&mut self, ctx: &AppContext, dt: f32) -> anyhow::Result<()>;

    /// Checked before every tick.
    ///
    /// Default implementation never asks to stop.
    fn should_exit(&self) -> bool {
        false
    }

    /// Called once after the last tick.
    ///
    /// Default implementation does nothing.
    #[allow(unused_variables)]
    fn cleanup(&mut self, ctx: &mut AppContext) {}
}
