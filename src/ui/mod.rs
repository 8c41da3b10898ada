use std::{error::Error, io, time::Duration};

use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event as CrosstermEvent, KeyCode,
        MouseButton, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Terminal,
};

use crate::{
    config,
    core::{SimConfig, World},
    render,
    types::{Bounds, Ripple, Ship, Tint, Vec2},
};

pub fn run() -> Result<(), Box<dyn Error>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut ui_state = UiState::new();
    let mut world = World::new(ui_state.bounds);
    let mut cfg = SimConfig::default();
    let mut ships: Vec<Ship> = Vec::with_capacity(config::SHIP_COUNT);
    let mut ripples: Vec<Ripple> = Vec::new();

    let tick_interval = Duration::from_millis(config::TICK_MS);
    let render_interval = Duration::from_secs_f32(1.0 / config::RENDER_HZ);
    let mut last_tick = std::time::Instant::now();
    let mut last_render = std::time::Instant::now();
    let mut sim_counter = 0_u32;
    let mut render_counter = 0_u32;
    let mut last_fps_sample = std::time::Instant::now();
    let mut sim_fps = 0.0_f32;
    let mut render_fps = 0.0_f32;

    loop {
        while last_tick.elapsed() >= tick_interval {
            world.tick(&cfg, ui_state.bounds);
            last_tick += tick_interval;
            sim_counter += 1;
        }

        while event::poll(Duration::from_millis(0))? {
            match event::read()? {
                CrosstermEvent::Key(key) => match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => {
                        shutdown_terminal(&mut terminal)?;
                        return Ok(());
                    }
                    KeyCode::Char('w') => cfg.brush = Some(Tint::White),
                    KeyCode::Char('r') => cfg.brush = Some(Tint::Red),
                    KeyCode::Char('y') => cfg.brush = Some(Tint::Yellow),
                    KeyCode::Char('g') => cfg.brush = Some(Tint::Green),
                    KeyCode::Char('c') => cfg.brush = Some(Tint::Cyan),
                    KeyCode::Char('b') => cfg.brush = Some(Tint::Blue),
                    KeyCode::Char('m') => cfg.brush = Some(Tint::Magenta),
                    KeyCode::Char('n') => cfg.brush = None,
                    KeyCode::Char('K') => cfg.raise_cohesion(),
                    KeyCode::Char('k') => cfg.lower_cohesion(),
                    KeyCode::Char('A') => cfg.raise_alignment(),
                    KeyCode::Char('a') => cfg.lower_alignment(),
                    KeyCode::Char('S') => cfg.raise_separation(),
                    KeyCode::Char('s') => cfg.lower_separation(),
                    KeyCode::Char('v') => cfg.toggle_averaging(),
                    _ => {}
                },
                CrosstermEvent::Mouse(mouse) => {
                    if mouse.kind == MouseEventKind::Down(MouseButton::Left) {
                        if let Some(pos) = ui_state.click_to_world(mouse.column, mouse.row) {
                            world.spawn_ripple(pos, cfg.brush);
                        }
                    }
                }
                _ => {}
            }
        }

        if last_render.elapsed() >= render_interval {
            world.snapshot(&mut ships);
            world.ripples_snapshot(&mut ripples);
            if last_fps_sample.elapsed() >= Duration::from_secs(1) {
                let secs = last_fps_sample.elapsed().as_secs_f32();
                sim_fps = sim_counter as f32 / secs;
                render_fps = render_counter as f32 / secs;
                sim_counter = 0;
                render_counter = 0;
                last_fps_sample = std::time::Instant::now();
            }
            terminal.draw(|frame| {
                let size = frame.size();
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([
                        Constraint::Length(3),
                        Constraint::Min(3),
                        Constraint::Length(3),
                    ])
                    .split(size);

                let header = Paragraph::new(format!(
                    "ships: {} | ripples: {} | cohesion: {} | alignment: {} | separation: {} | brush: {} | avg: {} | sim fps: {:.1} | render fps: {:.1}",
                    ships.len(),
                    ripples.len(),
                    cfg.cohesion,
                    cfg.alignment,
                    cfg.separation,
                    brush_label(cfg.brush),
                    cfg.averaging.label(),
                    sim_fps,
                    render_fps
                ))
                .block(Block::default().borders(Borders::ALL).title("ripplewake"));
                frame.render_widget(header, chunks[0]);

                ui_state.fit_viewport(chunks[1]);
                render::draw(
                    &ships,
                    &ripples,
                    ui_state.bounds,
                    render::Viewport {
                        width: ui_state.framebuf.width(),
                        height: ui_state.framebuf.height(),
                    },
                    &mut ui_state.framebuf,
                );

                let framebuf = &ui_state.framebuf;
                let lines: Vec<Line> = (0..framebuf.height())
                    .map(|y| {
                        let spans: Vec<Span> = (0..framebuf.width())
                            .map(|x| {
                                let cell = framebuf.get(x, y);
                                let [r, g, b] = cell.rgb;
                                Span::styled(
                                    cell.ch.to_string(),
                                    Style::default().fg(Color::Rgb(r, g, b)),
                                )
                            })
                            .collect();
                        Line::from(spans)
                    })
                    .collect();
                let viewport = Paragraph::new(lines)
                    .block(Block::default().borders(Borders::ALL).title("Viewport"));
                frame.render_widget(viewport, chunks[1]);

                let footer = Paragraph::new(
                    "mouse: spawn ripple | wrygcbm: brush color | n: invisible | K/k A/a S/s: raise/lower cohesion alignment separation | v: averaging mode | q: quit",
                )
                .block(Block::default().borders(Borders::ALL).title("Controls"));
                frame.render_widget(footer, chunks[2]);
            })?;

            last_render = std::time::Instant::now();
            render_counter += 1;
        }

        std::thread::sleep(Duration::from_millis(1));
    }
}

fn shutdown_terminal(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
) -> Result<(), Box<dyn Error>> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

fn brush_label(brush: Option<Tint>) -> &'static str {
    brush.map(Tint::name).unwrap_or("invisible")
}

struct UiState {
    framebuf: render::FrameBuffer,
    /// Inner area of the viewport block, for mapping mouse clicks.
    viewport_area: Rect,
    bounds: Bounds,
}

impl UiState {
    fn new() -> Self {
        Self {
            framebuf: render::FrameBuffer::new(0, 0),
            viewport_area: Rect::new(0, 0, 0, 0),
            bounds: Bounds::default(),
        }
    }

    /// Tracks the drawable cells inside the viewport block's borders and
    /// refits the domain bounds whenever the terminal is resized.
    fn fit_viewport(&mut self, block_area: Rect) {
        let inner = Rect {
            x: block_area.x + 1,
            y: block_area.y + 1,
            width: block_area.width.saturating_sub(2),
            height: block_area.height.saturating_sub(2),
        };
        self.viewport_area = inner;
        self.bounds = Bounds::from_viewport(inner.width, inner.height);
        if self.framebuf.width() != inner.width || self.framebuf.height() != inner.height {
            self.framebuf.resize(inner.width, inner.height);
        }
    }

    /// Maps a terminal cell inside the viewport to world coordinates, with
    /// the viewport center at the origin and world y growing upward.
    fn click_to_world(&self, column: u16, row: u16) -> Option<Vec2> {
        let area = self.viewport_area;
        if area.width == 0
            || area.height == 0
            || column < area.x
            || row < area.y
            || column >= area.x + area.width
            || row >= area.y + area.height
        {
            return None;
        }
        let fx = (column - area.x) as f32 / area.width as f32;
        let fy = (row - area.y) as f32 / area.height as f32;
        let window_w = 2.0 * self.bounds.half_width;
        let window_h = 2.0 * self.bounds.half_height;
        Some(Vec2::new(
            window_w * fx - self.bounds.half_width,
            self.bounds.half_height - window_h * fy,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod click_mapping {
        use super::*;

        fn state_with_area(x: u16, y: u16, w: u16, h: u16) -> UiState {
            let mut state = UiState::new();
            state.viewport_area = Rect::new(x, y, w, h);
            state.bounds = Bounds::from_viewport(w, h);
            state
        }

        #[test]
        fn click_outside_the_viewport_is_ignored() {
            let state = state_with_area(1, 1, 80, 24);
            assert_eq!(state.click_to_world(0, 0), None);
            assert_eq!(state.click_to_world(81, 10), None);
        }

        #[test]
        fn top_left_corner_maps_to_negative_x_positive_y() {
            let state = state_with_area(1, 1, 80, 24);
            let pos = state.click_to_world(1, 1).unwrap();
            assert!((pos.x + state.bounds.half_width).abs() < 1e-6);
            assert!((pos.y - state.bounds.half_height).abs() < 1e-6);
        }

        #[test]
        fn center_click_maps_near_the_origin() {
            let state = state_with_area(0, 0, 80, 24);
            let pos = state.click_to_world(40, 12).unwrap();
            assert!(pos.x.abs() < 0.05);
            assert!(pos.y.abs() < 0.05);
        }

        #[test]
        fn empty_viewport_rejects_all_clicks() {
            let state = state_with_area(0, 0, 0, 0);
            assert_eq!(state.click_to_world(0, 0), None);
        }
    }

    mod labels {
        use super::*;

        #[test]
        fn brush_label_names_the_tint_or_invisible() {
            assert_eq!(brush_label(Some(Tint::Red)), "red");
            assert_eq!(brush_label(None), "invisible");
        }
    }
}
