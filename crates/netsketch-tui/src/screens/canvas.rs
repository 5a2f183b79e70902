//! Canvas screen — draws the topology and turns mouse input into gestures.
//!
//! Mouse positions are handed to the controller as screen points (cells
//! relative to the inner canvas area). Hit testing uses the same
//! transform, so a press lands on whatever node is drawn under it.

use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::canvas::{Canvas, Context, Line as CanvasLine};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use netsketch_core::{
    EntityId, Gesture, InteractionState, Point, ScreenTransform, Topology, point_along,
};

use crate::action::Action;
use crate::component::Component;
use crate::theme;
use crate::viewport::{UNITS_PER_CELL, Viewport};

/// Press radius around a node label, in cells at zoom 1.
const HIT_RADIUS_CELLS: f64 = 3.5;
const PAN_STEP_CELLS: f64 = 4.0;

pub struct CanvasScreen {
    topology: Arc<Topology>,
    state: InteractionState,
    draft: Option<(Point, Point)>,
    viewport: Viewport,
    /// Inner drawing area from the last layout pass.
    area: Rect,
    badge_distance: f64,
}

impl CanvasScreen {
    pub fn new(badge_distance: f64) -> Self {
        Self {
            topology: Arc::new(Topology::default()),
            state: InteractionState::Idle,
            draft: None,
            viewport: Viewport::default(),
            area: Rect::default(),
            badge_distance,
        }
    }

    pub fn set_area(&mut self, area: Rect) {
        self.area = area;
    }

    /// Record where the panel will be drawn so mouse hits line up.
    pub fn set_layout(&mut self, outer: Rect) {
        self.set_area(drawing_area(outer));
    }

    pub fn transform(&self) -> ScreenTransform {
        self.viewport.transform()
    }

    /// Cell-centre screen point for an absolute terminal position.
    fn screen_point(&self, column: u16, row: u16) -> Point {
        Point::new(
            f64::from(column) - f64::from(self.area.x) + 0.5,
            f64::from(row) - f64::from(self.area.y) + 0.5,
        )
    }

    fn contains(&self, column: u16, row: u16) -> bool {
        column >= self.area.x
            && column < self.area.x + self.area.width
            && row >= self.area.y
            && row < self.area.y + self.area.height
    }

    fn node_under(&self, screen: Point) -> Option<EntityId> {
        let canvas = self.transform().invert(screen)?;
        let radius = HIT_RADIUS_CELLS * UNITS_PER_CELL / self.viewport.zoom;
        self.topology.node_at(canvas, radius).map(|n| n.id.clone())
    }

    fn viewport_changed(&self) -> Option<Action> {
        Some(Action::ViewportChanged(self.transform()))
    }

    fn mode_label(&self) -> String {
        let name = |id: &EntityId| {
            self.topology
                .node(id)
                .map_or_else(|| id.to_string(), |n| n.name().to_owned())
        };
        match &self.state {
            InteractionState::Idle | InteractionState::Selected(_) => String::new(),
            InteractionState::Connecting { source } => {
                format!("  ·  connecting from {}: click a target", name(source))
            }
            InteractionState::PendingPortConfirmation { source, target } => {
                format!("  ·  {} <---> {}: confirm ports", name(source), name(target))
            }
        }
    }

    fn node_style(&self, id: &EntityId, color: ratatui::style::Color) -> Style {
        let base = Style::default().fg(color);
        match &self.state {
            InteractionState::Selected(sel) if sel == id => base
                .bg(theme::BG_HIGHLIGHT)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED),
            InteractionState::Connecting { source } if source == id => {
                base.fg(theme::ELECTRIC_YELLOW).add_modifier(Modifier::BOLD)
            }
            InteractionState::PendingPortConfirmation { source, target }
                if source == id || target == id =>
            {
                base.fg(theme::ELECTRIC_YELLOW).add_modifier(Modifier::BOLD)
            }
            _ => base,
        }
    }

    fn paint(&self, ctx: &mut Context<'_>, height: f64) {
        let t = self.transform();
        // Canvas painting has y growing upward.
        let to_paint = |canvas: Point| {
            let p = t.apply(canvas);
            (p.x, height - 1.0 - p.y)
        };
        let topology = &self.topology;

        for link in &topology.links {
            let (Some(a), Some(b)) = (topology.node(&link.source_id), topology.node(&link.target_id))
            else {
                continue;
            };
            let (x1, y1) = to_paint(a.position());
            let (x2, y2) = to_paint(b.position());
            ctx.draw(&CanvasLine {
                x1,
                y1,
                x2,
                y2,
                color: theme::BORDER_GRAY,
            });
        }

        if let Some((from, to)) = self.draft {
            let (x1, y1) = to_paint(from);
            let (x2, y2) = to_paint(to);
            ctx.draw(&CanvasLine {
                x1,
                y1,
                x2,
                y2,
                color: theme::ELECTRIC_YELLOW,
            });
        }

        ctx.layer();

        // Port badges sit a fixed canvas distance along each cable.
        for link in &topology.links {
            let (Some(a), Some(b)) = (topology.node(&link.source_id), topology.node(&link.target_id))
            else {
                continue;
            };
            for (near, far, port) in [
                (a.position(), b.position(), &link.source_port),
                (b.position(), a.position(), &link.target_port),
            ] {
                let (x, y) = to_paint(point_along(near, far, self.badge_distance));
                ctx.print(
                    x - half_width(port),
                    y,
                    Span::styled(port.clone(), Style::default().fg(theme::ELECTRIC_PURPLE)),
                );
            }
        }

        for node in &topology.nodes {
            let label = format!("[{}] {}", node.kind, node.name());
            let (x, y) = to_paint(node.position());
            let style = self.node_style(&node.id, theme::device_color(node.kind));
            ctx.print(x - half_width(&label), y, Span::styled(label, style));
        }
    }
}

/// Braille area inside the bordered panel, above the hints row.
fn drawing_area(outer: Rect) -> Rect {
    let inner = Block::default().borders(Borders::ALL).inner(outer);
    Rect {
        height: inner.height.saturating_sub(1),
        ..inner
    }
}

/// Half the display width of `text`, for centring labels on a point.
fn half_width(text: &str) -> f64 {
    u32::try_from(text.chars().count()).map_or(0.0, f64::from) / 2.0
}

impl Component for CanvasScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match key.code {
            KeyCode::Left => self.viewport.pan_cells(-PAN_STEP_CELLS, 0.0),
            KeyCode::Right => self.viewport.pan_cells(PAN_STEP_CELLS, 0.0),
            KeyCode::Up => self.viewport.pan_cells(0.0, -PAN_STEP_CELLS / 2.0),
            KeyCode::Down => self.viewport.pan_cells(0.0, PAN_STEP_CELLS / 2.0),
            KeyCode::Char('+' | '=') => self.viewport.zoom_by(1, self.centre()),
            KeyCode::Char('-') => self.viewport.zoom_by(-1, self.centre()),
            KeyCode::Char('0') => self.viewport.reset(),
            _ => return Ok(None),
        }
        Ok(self.viewport_changed())
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        let point = self.screen_point(mouse.column, mouse.row);
        let inside = self.contains(mouse.column, mouse.row);

        let action = match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) if inside => {
                let gesture = match self.node_under(point) {
                    Some(id) => Gesture::PressNode(id),
                    None => Gesture::PressCanvas,
                };
                Some(Action::Gesture(gesture))
            }
            MouseEventKind::Drag(MouseButton::Left) | MouseEventKind::Moved => {
                Some(Action::Gesture(Gesture::PointerMove(point)))
            }
            // Releases always go through, so a drag that leaves the
            // canvas still ends.
            MouseEventKind::Up(MouseButton::Left) => Some(Action::Gesture(Gesture::PointerRelease)),
            MouseEventKind::ScrollUp if inside => {
                self.viewport.zoom_by(1, point);
                self.viewport_changed()
            }
            MouseEventKind::ScrollDown if inside => {
                self.viewport.zoom_by(-1, point);
                self.viewport_changed()
            }
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::TopologyUpdated(topology) => self.topology = Arc::clone(topology),
            Action::InteractionChanged { state, draft } => {
                self.state = state.clone();
                self.draft = *draft;
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let zoom_pct = (self.viewport.zoom * 100.0).round();
        let title = format!(" Canvas  ·  {zoom_pct}%{} ", self.mode_label());
        let block = Block::default()
            .title(title)
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.state.is_connecting() || self.state.is_pending() {
                theme::border_focused()
            } else {
                theme::border_default()
            });

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let canvas_area = drawing_area(area);
        let hints_area = Rect {
            y: inner.y + inner.height.saturating_sub(1),
            height: 1,
            ..inner
        };

        let width = f64::from(canvas_area.width.max(1));
        let height = f64::from(canvas_area.height.max(1));
        let canvas = Canvas::default()
            .marker(Marker::Braille)
            .x_bounds([0.0, width - 1.0])
            .y_bounds([0.0, height - 1.0])
            .paint(|ctx| self.paint(ctx, height));
        frame.render_widget(canvas, canvas_area);

        let hints = Line::from(vec![
            Span::styled(" 1-5 ", theme::key_hint_key()),
            Span::styled("add  ", theme::key_hint()),
            Span::styled("c ", theme::key_hint_key()),
            Span::styled("connect  ", theme::key_hint()),
            Span::styled("←→↑↓ ", theme::key_hint_key()),
            Span::styled("pan  ", theme::key_hint()),
            Span::styled("+/- ", theme::key_hint_key()),
            Span::styled("zoom  ", theme::key_hint()),
            Span::styled("0 ", theme::key_hint_key()),
            Span::styled("reset", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(hints), hints_area);
    }
}

impl CanvasScreen {
    fn centre(&self) -> Point {
        Point::new(
            f64::from(self.area.width) / 2.0,
            f64::from(self.area.height) / 2.0,
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use netsketch_core::{DeviceKind, TopologyStore};

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    /// A screen laid out at (1,1) with one router at canvas (150, 150),
    /// which the default viewport draws at cell (15, 7).
    fn screen_with_router() -> (CanvasScreen, EntityId) {
        let mut store = TopologyStore::new();
        let node = store
            .add_node_at(DeviceKind::Router, Point::new(150.0, 150.0))
            .unwrap();
        let mut screen = CanvasScreen::new(40.0);
        screen.set_area(Rect::new(1, 1, 80, 30));
        screen
            .update(&Action::TopologyUpdated(store.snapshot()))
            .unwrap();
        (screen, node.id)
    }

    #[test]
    fn press_on_node_becomes_press_node() {
        let (mut screen, id) = screen_with_router();
        let action = screen
            .handle_mouse_event(mouse(MouseEventKind::Down(MouseButton::Left), 16, 8))
            .unwrap();
        assert!(matches!(action, Some(Action::Gesture(Gesture::PressNode(hit))) if hit == id));
    }

    #[test]
    fn press_on_empty_space_becomes_press_canvas() {
        let (mut screen, _) = screen_with_router();
        let action = screen
            .handle_mouse_event(mouse(MouseEventKind::Down(MouseButton::Left), 70, 25))
            .unwrap();
        assert!(matches!(action, Some(Action::Gesture(Gesture::PressCanvas))));
    }

    #[test]
    fn press_outside_the_canvas_is_ignored_but_release_is_not() {
        let (mut screen, _) = screen_with_router();
        let down = screen
            .handle_mouse_event(mouse(MouseEventKind::Down(MouseButton::Left), 0, 0))
            .unwrap();
        assert!(down.is_none());
        let up = screen
            .handle_mouse_event(mouse(MouseEventKind::Up(MouseButton::Left), 0, 0))
            .unwrap();
        assert!(matches!(up, Some(Action::Gesture(Gesture::PointerRelease))));
    }

    #[test]
    fn drag_reports_screen_points_relative_to_the_area() {
        let (mut screen, _) = screen_with_router();
        let action = screen
            .handle_mouse_event(mouse(MouseEventKind::Drag(MouseButton::Left), 11, 6))
            .unwrap();
        match action {
            Some(Action::Gesture(Gesture::PointerMove(p))) => {
                assert!(p.distance_to(Point::new(10.5, 5.5)) < 1e-9);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn zoom_keys_publish_a_new_transform() {
        let (mut screen, _) = screen_with_router();
        let before = screen.transform();
        let action = screen
            .handle_key_event(KeyEvent::new(KeyCode::Char('+'), KeyModifiers::NONE))
            .unwrap();
        match action {
            Some(Action::ViewportChanged(t)) => assert!(t.scale_x > before.scale_x),
            other => panic!("unexpected {other:?}"),
        }
    }
}
