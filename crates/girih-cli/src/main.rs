//! girih - live preview and export for generative patterns
//!
//! Usage:
//!   girih [--seed N] [--config show.yaml] [--theme dark]   Launch live preview
//!   girih generate <pattern> [options]                     Export one pattern
//!   girih render [options]                                 Export animation frames
//!   girih show <show.yaml> | --example                     Check a show file
//!   girih patterns                                         List generators

mod cli;

use std::env;
use std::io::{self, stdout};
use std::time::{Duration, Instant};

use crossterm::{
    ExecutableCommand,
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseEventKind},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};
use ratatui_image::{
    StatefulImage,
    picker::{Picker, ProtocolType},
    protocol::StatefulProtocol,
};

use girih::{AnimationSession, Pattern, SessionConfig, Surface, Theme};

use cli::common::{parse_value, resolve_seed};
use cli::{RasterSurface, Show, cmd_generate, cmd_render, cmd_show};

/// Logical pixels per terminal cell, matching the picker's fallback font size.
const CELL_PX: (u32, u32) = (8, 16);

/// Target frame time for the preview loop.
const FRAME_TIME: Duration = Duration::from_millis(33);

/// Live preview settings from the command line.
struct PreviewOptions {
    seed: u64,
    config: SessionConfig,
}

/// Application state for TUI
struct App {
    /// Animation; `None` until the preview area has a size
    session: Option<AnimationSession<RasterSurface>>,
    config: SessionConfig,
    seed: u64,
    /// Theme applied to the session on every frame
    theme: Theme,
    /// Preview area in terminal cells from the last draw
    preview_cells: (u16, u16),
    /// Last size handed to `request_resize`
    requested_size: Option<(u32, u32)>,
    /// Image picker for terminal protocol detection
    picker: Picker,
    /// Current rendered image protocol state
    image_state: Option<Box<dyn StatefulProtocol>>,
    paused: bool,
    should_quit: bool,
    /// Smoothed frame time for the status line
    frame_ms: f64,
}

impl App {
    fn new(opts: PreviewOptions) -> Self {
        // Initialize image picker - force Sixel protocol
        let mut picker = Picker::from_termios().unwrap_or_else(|_| Picker::new((8, 16)));
        picker.protocol_type = ProtocolType::Sixel;

        App {
            session: None,
            theme: opts.config.theme,
            config: opts.config,
            seed: opts.seed,
            preview_cells: (0, 0),
            requested_size: None,
            picker,
            image_state: None,
            paused: false,
            should_quit: false,
            frame_ms: 0.0,
        }
    }

    fn pixel_size(&self) -> (u32, u32) {
        (self.preview_cells.0 as u32 * CELL_PX.0, self.preview_cells.1 as u32 * CELL_PX.1)
    }

    /// Attach on the first usable size, debounce resizes after that.
    fn sync_size(&mut self) {
        let (width, height) = self.pixel_size();
        match self.session.as_mut() {
            None => {
                let surface = RasterSurface::new(width, height, 1.0);
                self.session = AnimationSession::attach(Some(surface), self.config.clone(), self.seed);
            }
            Some(session) => {
                let target = (width, height);
                if session.surface().size() != target && self.requested_size != Some(target) {
                    session.request_resize(width, height);
                    self.requested_size = Some(target);
                }
            }
        }
    }

    fn step(&mut self) {
        if self.paused {
            return;
        }
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let start = Instant::now();
        session.theme = self.theme;
        session.tick();
        if let Some(img) = session.surface().to_image() {
            self.image_state = Some(self.picker.new_resize_protocol(img));
        }
        let ms = start.elapsed().as_secs_f64() * 1000.0;
        self.frame_ms = self.frame_ms * 0.9 + ms * 0.1;
    }

    fn trigger(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.trigger();
        }
    }

    fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
    }

    fn status(&self) -> String {
        let Some(session) = self.session.as_ref() else {
            return "waiting for a preview area...".to_string();
        };
        let scene = session.current();
        let state = if self.paused {
            "paused"
        } else if scene.fading_out {
            "fading"
        } else if scene.done {
            "holding"
        } else {
            "spawning"
        };
        format!(
            "{}  {}/{} units  {}  frame {}  {}  {:.1}ms",
            scene.spec.pattern().name(),
            scene.born_count(),
            scene.units.len(),
            state,
            session.frame(),
            self.theme.name(),
            self.frame_ms
        )
    }
}

fn main() {
    let args: Vec<String> = env::args().collect();

    // Check for CLI subcommands
    if args.len() >= 2 {
        match args[1].as_str() {
            "generate" => {
                cmd_generate(&args[2..]);
                return;
            }
            "render" => {
                cmd_render(&args[2..]);
                return;
            }
            "show" => {
                cmd_show(&args[2..]);
                return;
            }
            "patterns" => {
                cmd_patterns();
                return;
            }
            "help" | "--help" | "-h" => {
                print_usage(&args[0]);
                return;
            }
            _ => {}
        }
    }

    let opts = match parse_preview_args(&args[1..]) {
        Ok(opts) => opts,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!();
            print_usage(&args[0]);
            std::process::exit(1);
        }
    };

    if let Err(e) = run_tui(opts) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn parse_preview_args(args: &[String]) -> Result<PreviewOptions, String> {
    let mut seed: Option<u64> = None;
    let mut config = SessionConfig::default();
    let mut theme: Option<Theme> = None;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--seed" => {
                i += 1;
                seed = Some(parse_value("--seed", args.get(i))?);
            }
            "-c" | "--config" => {
                i += 1;
                let path = args.get(i).ok_or("--config requires a value")?;
                let show = Show::load(path).map_err(|e| e.to_string())?;
                config = show.session_config().map_err(|e| e.to_string())?;
                seed = seed.or(show.seed);
            }
            "--theme" => {
                i += 1;
                let name = args.get(i).ok_or("--theme requires a value")?;
                theme = Some(Theme::from_name(name).ok_or_else(|| format!("Unknown theme: {}", name))?);
            }
            other => return Err(format!("Unknown command or option: {}", other)),
        }
        i += 1;
    }

    if let Some(theme) = theme {
        config = config.with_theme(theme);
    }
    Ok(PreviewOptions { seed: resolve_seed(seed), config })
}

fn run_tui(opts: PreviewOptions) -> Result<(), String> {
    // Initialize terminal
    enable_raw_mode().map_err(|e| e.to_string())?;
    stdout().execute(EnterAlternateScreen).map_err(|e| e.to_string())?;
    stdout().execute(EnableMouseCapture).map_err(|e| e.to_string())?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout())).map_err(|e| e.to_string())?;

    let mut app = App::new(opts);

    // Main loop
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    stdout().execute(DisableMouseCapture).map_err(|e| e.to_string())?;
    disable_raw_mode().map_err(|e| e.to_string())?;
    stdout().execute(LeaveAlternateScreen).map_err(|e| e.to_string())?;

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<(), String> {
    loop {
        let frame_start = Instant::now();

        app.step();
        terminal.draw(|frame| ui(frame, app)).map_err(|_| "Draw error".to_string())?;
        app.sync_size();

        let timeout = FRAME_TIME.saturating_sub(frame_start.elapsed());
        if event::poll(timeout).map_err(|e| e.to_string())? {
            match event::read().map_err(|e| e.to_string())? {
                Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => {
                        app.should_quit = true;
                    }
                    KeyCode::Char('n') | KeyCode::Char(' ') | KeyCode::Enter => {
                        app.trigger();
                    }
                    KeyCode::Char('t') => {
                        app.toggle_theme();
                    }
                    KeyCode::Char('p') => {
                        app.paused = !app.paused;
                    }
                    _ => {}
                },
                Event::Mouse(mouse) => {
                    if let MouseEventKind::Down(_) = mouse.kind {
                        app.trigger();
                    }
                }
                // The next draw picks up the new area
                Event::Resize(_, _) => {}
                _ => {}
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &mut App) {
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(3)])
        .split(frame.area());

    let border_color = match app.theme {
        Theme::Light => Color::Yellow,
        Theme::Dark => Color::Cyan,
    };

    // Create inner area for image (accounting for border)
    let image_block = Block::default()
        .title(format!(" girih  seed {} ", app.seed))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));

    let inner_area = image_block.inner(main_layout[0]);
    frame.render_widget(image_block, main_layout[0]);
    app.preview_cells = (inner_area.width, inner_area.height);

    // Render the image using ratatui-image
    if let Some(ref mut image_state) = app.image_state {
        let image_widget = StatefulImage::new(None);
        frame.render_stateful_widget(image_widget, inner_area, image_state);
    }

    let status_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(main_layout[1]);

    let status = Paragraph::new(app.status())
        .style(Style::default().fg(Color::White))
        .block(Block::default().title(" Scene ").borders(Borders::ALL));
    frame.render_widget(status, status_layout[0]);

    let help = Paragraph::new("click/n new scene  t theme  p pause  q quit")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(help, status_layout[1]);
}

fn print_usage(prog: &str) {
    eprintln!("girih - generative pattern animation");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  {} [--seed N] [--config show.yaml] [--theme light|dark]   Live preview", prog);
    eprintln!("  {} generate <pattern> [options]", prog);
    eprintln!("  {} render [options]", prog);
    eprintln!("  {} show <show.yaml> | --example", prog);
    eprintln!("  {} patterns", prog);
    eprintln!();
    eprintln!("Run '{} <command> --help' for command options.", prog);
    eprintln!();
    eprintln!("Preview Controls:");
    eprintln!("  click / n / space   Start a new scene");
    eprintln!("  t                   Toggle light/dark theme");
    eprintln!("  p                   Pause");
    eprintln!("  q / Esc             Quit");
}

fn cmd_patterns() {
    println!("Available patterns:");
    for pattern in Pattern::all() {
        let meta = pattern.metadata();
        println!("  {:<10} {} (size: {})", pattern.name(), meta.description, meta.size_label);
    }
}
