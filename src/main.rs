//! Vector Verse - Native entry point
//!
//! A line-oriented front end over the engine. The browser build drives the
//! same engine through `vector_verse::web`.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::io::{self, BufRead, Write};
    use std::path::PathBuf;

    use anyhow::{Context, Result, bail};
    use glam::Vec2;
    use vector_verse::sim::{
        ActionMode, ApplyOutcome, GamePhase, GameState, HintTarget, InputField, Operation,
        SandboxMode, tick,
    };
    use vector_verse::{Catalog, Settings, format_component, vector_name};

    const HELP: &str = "\
Commands:
  x N | y N | sx N | sy N | s N   set input field (vector, start point, scalar)
  v X Y                           set vector and apply
  apply                           commit the input form
  undo                            remove the last vector
  del N                           delete vector number N (1-based)
  action move|shoot               choose what apply does
  op add|sub                      choose the sign of chain vectors
  mode chain|origin|points|parametric   sandbox input mode
  hint                            suggest a vector toward the nearest coin
  target X Y                      place a coin (sandbox)
  tick [N]                        advance N animation frames (default 30)
  level N | next | skip | reset | sandbox
  close | cheat                   close the tutorial / toggle cheat sheet
  status | help | quit";

    fn fmt_vec(v: Vec2) -> String {
        format!("({}, {})", format_component(v.x), format_component(v.y))
    }

    fn load_catalog(settings: &Settings) -> Result<Catalog> {
        match &settings.catalog_path {
            Some(path) => Catalog::load(path)
                .with_context(|| format!("loading level catalog {}", path.display())),
            None => Catalog::builtin().context("parsing built-in level catalog"),
        }
    }

    fn print_level(state: &GameState) {
        let level = state.level();
        println!("== {} ==", level.title);
        if !level.description.is_empty() {
            println!("{}", level.description);
        }
        if state.show_tutorial {
            if let Some(tutorial) = &level.tutorial {
                println!("-- {} --\n{}", tutorial.title, tutorial.text);
                println!("(type `close` to continue)");
            }
        }
    }

    fn print_status(state: &GameState) {
        let level = state.level();
        println!("Level {} [{:?}]  player {}", level.id, state.phase, fmt_vec(state.player));
        if state.is_sandbox() {
            println!("  sandbox mode: {}", state.sandbox_mode.as_str());
        }
        println!("  action {:?}, operation {:?}", state.action, state.operation);
        for (i, record) in state.history.iter().enumerate() {
            println!(
                "  {} = {} from {}{}",
                vector_name(i),
                fmt_vec(record.displacement),
                fmt_vec(record.start),
                if record.is_scaled { " (scaled)" } else { "" }
            );
        }
        for obj in &state.objects {
            let mark = if obj.collected { "x" } else { " " };
            if obj.max_hp > 0 {
                println!("  {} {:?} {} hp {}/{}", obj.id, obj.kind, fmt_vec(obj.pos), obj.hp, obj.max_hp);
            } else {
                println!("  [{}] {:?} {} {}", mark, obj.kind, obj.id, fmt_vec(obj.pos));
            }
        }
        if level.mechanics.has_monster {
            println!("  ammo {}, shots in flight {}", state.ammo, state.projectiles.len());
        }
    }

    fn report_phase(state: &GameState, before: GamePhase) {
        if state.phase == before {
            return;
        }
        match state.phase {
            GamePhase::LevelComplete => println!("Level complete! Type `next` to continue."),
            GamePhase::GameWon => println!("You won!"),
            GamePhase::Playing => {}
        }
    }

    /// Run frames until queued transitions have had a chance to fire
    fn run_frames(state: &mut GameState, frames: u64) {
        let before = state.phase;
        for _ in 0..frames {
            tick(state);
        }
        report_phase(state, before);
    }

    fn parse_f32(arg: Option<&str>) -> Result<f32> {
        let text = arg.context("missing number")?;
        text.parse().with_context(|| format!("not a number: {text}"))
    }

    fn apply(state: &mut GameState) {
        match state.apply_vector() {
            ApplyOutcome::Moved { position, collected } => {
                print!("Moved to {}", fmt_vec(position));
                if collected > 0 {
                    print!(", collected {collected}");
                }
                println!();
            }
            ApplyOutcome::Shot { projectile } => println!("Fired shot #{projectile}"),
            ApplyOutcome::Refused(reason) => println!("Refused: {reason:?}"),
        }
        // Let the pickup transition delay elapse so the result is visible
        run_frames(state, vector_verse::consts::TRANSITION_DELAY_TICKS);
    }

    fn set_field(state: &mut GameState, field: InputField, arg: Option<&str>) -> Result<()> {
        let text = arg.context("missing value")?;
        if !state.edit_input(field, text) {
            bail!("{text} is not allowed on this level");
        }
        Ok(())
    }

    /// Returns false when the session should end
    fn handle(state: &mut GameState, line: &str) -> Result<bool> {
        let mut words = line.split_whitespace();
        let Some(cmd) = words.next() else {
            return Ok(true);
        };
        let arg = words.next();

        match cmd {
            "x" => set_field(state, InputField::X, arg)?,
            "y" => set_field(state, InputField::Y, arg)?,
            "sx" => set_field(state, InputField::StartX, arg)?,
            "sy" => set_field(state, InputField::StartY, arg)?,
            "s" => set_field(state, InputField::Scalar, arg)?,
            "v" => {
                set_field(state, InputField::X, arg)?;
                set_field(state, InputField::Y, words.next())?;
                apply(state);
            }
            "apply" => apply(state),
            "undo" => {
                if !state.undo_last() {
                    println!("Nothing to undo");
                }
            }
            "del" => {
                let n: usize = arg.context("missing vector number")?.parse()?;
                if n == 0 || !state.delete_vector(n - 1) {
                    bail!("no vector {n}");
                }
            }
            "action" => match arg {
                Some("move") => state.toggle_action_mode(ActionMode::Move),
                Some("shoot") => state.toggle_action_mode(ActionMode::Shoot),
                _ => bail!("expected move or shoot"),
            },
            "op" => match arg {
                Some("add") => state.toggle_operation(Operation::Add),
                Some("sub") => state.toggle_operation(Operation::Subtract),
                _ => bail!("expected add or sub"),
            },
            "mode" => {
                let mode = arg.and_then(SandboxMode::from_str).context("unknown mode")?;
                if !state.switch_sandbox_mode(mode) {
                    bail!("input modes are only available in the sandbox");
                }
            }
            "hint" => match state.request_hint() {
                Some(hint) => {
                    match hint.target {
                        HintTarget::Absolute(p) => println!("Target point {}", fmt_vec(p)),
                        HintTarget::Relative(d) => println!("Target is {} away", fmt_vec(d)),
                    }
                    println!("Try {} (prefilled)", fmt_vec(hint.suggestion));
                }
                None => println!("No coins left"),
            },
            "target" => {
                let world = Vec2::new(parse_f32(arg)?, parse_f32(words.next())?);
                match state.place_target(world) {
                    Some(obj) => println!("Placed {} at {}", obj.id, fmt_vec(obj.pos)),
                    None => bail!("targets can only be placed in the sandbox"),
                }
            }
            "tick" => {
                let frames: u64 = arg.map(str::parse).transpose()?.unwrap_or(30);
                run_frames(state, frames);
            }
            "level" => {
                let index: usize = arg.context("missing level number")?.parse()?;
                state.switch_level(index);
                print_level(state);
            }
            "next" => {
                if state.advance_level() {
                    print_level(state);
                } else {
                    println!("Finish the level first (or `skip`)");
                }
            }
            "skip" => {
                state.skip_level();
                print_level(state);
            }
            "reset" => {
                state.reset_level();
                print_level(state);
            }
            "sandbox" => {
                state.start_sandbox();
                print_level(state);
            }
            "close" => state.close_tutorial(),
            "cheat" => {
                if state.toggle_cheat_sheet() {
                    if let Some(edu) = &state.level().edu_content {
                        println!("-- {} --\n{}", edu.concept, edu.explanation);
                        if let Some(formula) = &edu.formula {
                            println!("  {formula}");
                        }
                    }
                } else {
                    println!("Cheat sheet closed");
                }
            }
            "status" => print_status(state),
            "help" => println!("{HELP}"),
            "quit" | "exit" => return Ok(false),
            other => bail!("unknown command `{other}` (try `help`)"),
        }
        Ok(true)
    }

    pub fn run() -> Result<()> {
        env_logger::init();
        log::info!("Vector Verse (native) starting...");

        let settings_path = std::env::args()
            .nth(1)
            .map(PathBuf::from)
            .unwrap_or_else(Settings::default_path);
        let settings = Settings::load_from(&settings_path);
        let catalog = load_catalog(&settings)?;
        log::info!("Loaded {} levels", catalog.len());

        let mut state = GameState::new(catalog, settings);
        print_level(&state);
        println!("Type `help` for commands.");

        let stdin = io::stdin();
        let mut stdout = io::stdout();
        loop {
            print!("> ");
            stdout.flush()?;

            let mut line = String::new();
            if stdin.lock().read_line(&mut line)? == 0 {
                break;
            }
            match handle(&mut state, line.trim()) {
                Ok(true) => {}
                Ok(false) => break,
                Err(e) => println!("Error: {e:#}"),
            }
        }

        log::info!("Session ended on level {}", state.level_index);
        Ok(())
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    native::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is vector_verse::web::wasm_start, this is just to satisfy the compiler
}
