/// Terminal front end: renders a stage as ASCII and simulates page scroll
use crossterm::{
    cursor,
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, MouseEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};
use scroll3d_core::chrome::{Carousel, NavBar};
use scroll3d_core::{Asset, CanvasSize, ScrollTrigger, Stage, TriggerLayout, ViewerConfig};

pub mod renderer;

pub use renderer::AsciiRenderer;

/// Virtual page the trigger element lives on, in CSS pixels
pub const PAGE_LAYOUT: TriggerLayout = TriggerLayout {
    element_top: 600.0,
    element_height: 2400.0,
    viewport_height: 800.0,
};

const SCROLL_STEP: f32 = 40.0;
const PAGE_STEP: f32 = 400.0;
const TICKER: &str = "  APPLE  ·  NVIDIA  ·  ADOBE  ·  FIGMA  ·  NOTION  ·  LINEAR  ·";

/// Terminal cells are roughly twice as tall as they are wide
const CELL_ASPECT: f32 = 0.5;

/// Page scroll offset clamped to the scrollable range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageScroll {
    pub offset: f32,
    pub max: f32,
}

impl PageScroll {
    pub fn new(layout: &TriggerLayout) -> Self {
        // Page extends one viewport past the trigger element
        let page_height = layout.element_top + layout.element_height + layout.viewport_height;
        Self {
            offset: 0.0,
            max: (page_height - layout.viewport_height).max(0.0),
        }
    }

    pub fn scroll_by(&mut self, delta: f32) -> f32 {
        self.offset = (self.offset + delta).clamp(0.0, self.max);
        self.offset
    }
}

/// Main application struct for terminal 3D rendering
pub struct TerminalApp {
    stage: Stage,
    trigger: ScrollTrigger,
    page: PageScroll,
    nav: NavBar,
    carousel: Carousel,
    renderer: AsciiRenderer,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(asset: Asset, config: &ViewerConfig) -> scroll3d_core::Result<Self> {
        let (width, height) = terminal::size()?;
        Self::with_size(asset, config, width, height)
    }

    /// Build for a terminal of `width` x `height` cells
    pub fn with_size(asset: Asset, config: &ViewerConfig, width: u16, height: u16) -> scroll3d_core::Result<Self> {
        let viewport = viewport_for(width, height);

        let mut stage = Stage::new(asset, config, viewport);
        stage.set_viewport(viewport);

        let mut trigger = ScrollTrigger::from_config(&config.trigger)?;
        trigger.refresh(PAGE_LAYOUT, true, &mut stage);

        Ok(Self {
            stage,
            trigger,
            page: PageScroll::new(&PAGE_LAYOUT),
            nav: NavBar::new(config.chrome.nav_threshold, config.chrome.nav_class.clone()),
            carousel: Carousel::new(config.chrome.carousel_speed),
            renderer: AsciiRenderer::new(width as usize, render_rows(height)),
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide, EnableMouseCapture)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), DisableMouseCapture, terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / 30); // 30 FPS target

        while self.running {
            let frame_start = Instant::now();

            // Handle input
            while event::poll(Duration::from_millis(0))? {
                self.handle_event(event::read()?);
            }

            // Render
            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(KeyEvent { code, .. }) => match code {
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.running = false;
                }
                KeyCode::Char('j') | KeyCode::Down => self.scroll_by(SCROLL_STEP),
                KeyCode::Char('k') | KeyCode::Up => self.scroll_by(-SCROLL_STEP),
                KeyCode::PageDown | KeyCode::Char(' ') => self.scroll_by(PAGE_STEP),
                KeyCode::PageUp => self.scroll_by(-PAGE_STEP),
                KeyCode::Home => self.scroll_by(-self.page.max),
                KeyCode::End => self.scroll_by(self.page.max),
                _ => {}
            },
            Event::Mouse(mouse) => match mouse.kind {
                MouseEventKind::ScrollDown => self.scroll_by(SCROLL_STEP),
                MouseEventKind::ScrollUp => self.scroll_by(-SCROLL_STEP),
                _ => {}
            },
            Event::Resize(width, height) => self.resize(width, height),
            _ => {}
        }
    }

    fn scroll_by(&mut self, delta: f32) {
        let offset = self.page.scroll_by(delta);
        self.trigger.update(offset, &mut self.stage);
    }

    fn resize(&mut self, width: u16, height: u16) {
        self.stage.set_viewport(viewport_for(width, height));
        self.renderer.resize(width as usize, render_rows(height));
        self.trigger.refresh(PAGE_LAYOUT, false, &mut self.stage);
    }

    fn render(&mut self) -> io::Result<()> {
        self.renderer.render(&mut self.stage);

        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 1))?;
        self.renderer.draw(&mut stdout)?;

        let (width, height) = terminal::size()?;
        let status = self.status_line();
        let nav_color = if self.nav.is_solid(self.page.offset) {
            Color::White
        } else {
            Color::DarkGrey
        };
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            terminal::Clear(terminal::ClearType::CurrentLine),
            SetForegroundColor(nav_color),
            Print(fit(&status, width as usize)),
            cursor::MoveTo(0, height.saturating_sub(1)),
            terminal::Clear(terminal::ClearType::CurrentLine),
            SetForegroundColor(Color::Yellow),
            Print(self.ticker(width as usize)),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }

    fn status_line(&self) -> String {
        let (rotation, height) = self
            .stage
            .last_transform()
            .map(|t| (t.rotation_angle, t.camera_height))
            .unwrap_or((0.0, self.stage.camera().position.y));
        format!(
            "scroll3d | FPS: {:.1} | scroll {:>5.0}px | progress {:>5.1}% | rotation {:+.2} rad | camera y {:.2} | j/k wheel=Scroll Q=Quit",
            self.fps,
            self.page.offset,
            self.trigger.progress() * 100.0,
            rotation,
            height,
        )
    }

    fn ticker(&mut self, width: usize) -> String {
        let chars: Vec<char> = TICKER.chars().collect();
        // Track holds the ticker twice, so half its width is one full cycle
        let offset = self.carousel.step(chars.len() as f32 * 2.0) as usize;
        (0..width).map(|i| chars[(offset + i) % chars.len()]).collect()
    }
}

/// Rows left for the scene between the status line and the ticker
fn render_rows(height: u16) -> usize {
    height.saturating_sub(2).max(1) as usize
}

fn viewport_for(width: u16, height: u16) -> CanvasSize {
    CanvasSize {
        width: width.max(1) as f32,
        height: render_rows(height) as f32 / CELL_ASPECT,
    }
}

fn fit(text: &str, width: usize) -> String {
    text.chars().take(width).collect()
}
