//! Browser bindings
//!
//! The host page owns the canvas and DOM; it forwards input here and draws
//! from the JSON snapshot returned by `snapshot_json`.

use glam::Vec2;
use wasm_bindgen::prelude::*;

use crate::level::Catalog;
use crate::settings::Settings;
use crate::sim::{
    ActionMode, ApplyOutcome, FrameClock, GameState, InputField, Operation, SandboxMode,
};
use crate::view::ViewTransform;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialised".into());
    }
    log::info!("Vector Verse starting...");
}

fn field_from_name(name: &str) -> Option<InputField> {
    match name {
        "x" => Some(InputField::X),
        "y" => Some(InputField::Y),
        "start_x" => Some(InputField::StartX),
        "start_y" => Some(InputField::StartY),
        "scalar" => Some(InputField::Scalar),
        _ => None,
    }
}

/// Engine handle exported to JavaScript
#[wasm_bindgen]
pub struct WebGame {
    state: GameState,
    clock: FrameClock,
    view: ViewTransform,
}

#[wasm_bindgen]
impl WebGame {
    #[wasm_bindgen(constructor)]
    pub fn new(width: f32, height: f32) -> Result<WebGame, JsError> {
        let catalog = Catalog::builtin().map_err(|e| JsError::new(&e.to_string()))?;
        let settings = Settings::load();
        let mut game = WebGame {
            state: GameState::new(catalog, settings),
            clock: FrameClock::new(),
            view: ViewTransform::new(width, height),
        };
        game.clock.start();
        game.refit();
        Ok(game)
    }

    fn refit(&mut self) {
        if self.state.settings.auto_fit {
            self.view.fit_state(&self.state);
        }
    }

    /// Advance animation by `elapsed_ms` of wall-clock time
    pub fn frame(&mut self, elapsed_ms: f64) -> u32 {
        self.clock.advance(&mut self.state, (elapsed_ms / 1000.0) as f32)
    }

    pub fn pause(&mut self) {
        self.clock.stop();
    }

    pub fn resume(&mut self) {
        self.clock.start();
    }

    /// JSON snapshot of everything the page draws
    pub fn snapshot_json(&self) -> Result<String, JsError> {
        serde_json::to_string(&self.state.snapshot()).map_err(|e| JsError::new(&e.to_string()))
    }

    /// Returns false when the edit violates the level's input constraints
    pub fn edit_input(&mut self, field: &str, text: &str) -> bool {
        match field_from_name(field) {
            Some(field) => self.state.edit_input(field, text),
            None => false,
        }
    }

    /// Commit the input form. Returns "moved", "shot", or the refusal reason.
    pub fn apply(&mut self) -> String {
        let outcome = self.state.apply_vector();
        if matches!(outcome, ApplyOutcome::Moved { .. }) {
            self.refit();
        }
        match outcome {
            ApplyOutcome::Moved { .. } => "moved".into(),
            ApplyOutcome::Shot { .. } => "shot".into(),
            ApplyOutcome::Refused(reason) => format!("{reason:?}"),
        }
    }

    pub fn undo(&mut self) -> bool {
        let undone = self.state.undo_last();
        if undone {
            self.refit();
        }
        undone
    }

    pub fn delete_vector(&mut self, index: usize) -> bool {
        let deleted = self.state.delete_vector(index);
        if deleted {
            self.refit();
        }
        deleted
    }

    pub fn set_shoot(&mut self, shoot: bool) {
        self.state.toggle_action_mode(if shoot { ActionMode::Shoot } else { ActionMode::Move });
    }

    pub fn set_subtract(&mut self, subtract: bool) {
        self.state
            .toggle_operation(if subtract { Operation::Subtract } else { Operation::Add });
    }

    pub fn set_sandbox_mode(&mut self, mode: &str) -> bool {
        match SandboxMode::from_str(mode) {
            Some(mode) => self.state.switch_sandbox_mode(mode),
            None => false,
        }
    }

    /// Request a hint; returns false when no coin is left
    pub fn hint(&mut self) -> bool {
        self.state.request_hint().is_some()
    }

    pub fn switch_level(&mut self, index: usize) -> usize {
        let entered = self.state.switch_level(index);
        self.refit();
        entered
    }

    pub fn next_level(&mut self) -> bool {
        let advanced = self.state.advance_level();
        if advanced {
            self.refit();
        }
        advanced
    }

    pub fn skip_level(&mut self) -> usize {
        let entered = self.state.skip_level();
        self.refit();
        entered
    }

    pub fn reset_level(&mut self) {
        self.state.reset_level();
        self.refit();
    }

    pub fn start_sandbox(&mut self) {
        self.state.start_sandbox();
        self.refit();
    }

    pub fn close_tutorial(&mut self) {
        self.state.close_tutorial();
    }

    pub fn toggle_cheat_sheet(&mut self) -> bool {
        self.state.toggle_cheat_sheet()
    }

    pub fn level_count(&self) -> usize {
        self.state.catalog().len()
    }

    // View

    pub fn resize(&mut self, width: f32, height: f32) {
        self.view.resize(width, height);
    }

    pub fn wheel(&mut self, delta_y: f32) {
        self.view.wheel(delta_y);
    }

    pub fn pointer_down(&mut self, x: f32, y: f32) {
        self.view.begin_drag(Vec2::new(x, y));
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        self.view.drag_to(Vec2::new(x, y));
    }

    /// A release without movement places a sandbox target
    pub fn pointer_up(&mut self, x: f32, y: f32) {
        let screen = Vec2::new(x, y);
        if self.view.end_drag(screen) {
            let world = self.view.screen_to_world(screen);
            self.state.place_target(world);
        }
    }

    /// Double-click deletes the vector under the pointer
    pub fn double_click(&mut self, x: f32, y: f32) -> bool {
        match self.view.pick_vector(&self.state.history, Vec2::new(x, y)) {
            Some(index) => self.delete_vector(index),
            None => false,
        }
    }

    pub fn fit(&mut self) {
        self.view.fit_state(&self.state);
    }

    /// World -> screen, as [x, y]
    pub fn to_screen(&self, x: f32, y: f32) -> Vec<f32> {
        self.view.world_to_screen(Vec2::new(x, y)).to_array().to_vec()
    }

    pub fn zoom(&self) -> f32 {
        self.view.zoom
    }

    // Settings

    pub fn settings_json(&self) -> Result<String, JsError> {
        serde_json::to_string(&self.state.settings).map_err(|e| JsError::new(&e.to_string()))
    }

    /// Replace settings from JSON and persist them
    pub fn update_settings(&mut self, json: &str) {
        self.state.settings = Settings::from_json(json);
        self.state.settings.save();
    }
}
