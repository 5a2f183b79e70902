//! Application core — event loop, action dispatch and overlays.
//!
//! The app owns the [`InteractionController`]. Panels never mutate the
//! topology themselves: they emit [`Action`]s, the app applies them to the
//! controller, and the resulting snapshots come back through the data
//! bridge.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use netsketch_config::Config;
use netsketch_core::analysis::{self, FAILURE_MESSAGE};
use netsketch_core::{
    CoreError, DeviceKind, EntityId, Gesture, InteractionController, InteractionState, Node,
    TopologyStore, codec,
};

use crate::action::{Action, Notification, NotificationLevel};
use crate::component::Component;
use crate::event::{Event, EventReader};
use crate::screens::{CanvasScreen, PropertiesPanel};
use crate::theme;
use crate::tui::Tui;
use crate::widgets::{FormDialog, FormOutcome, FormPurpose};

const PANEL_WIDTH: u16 = 38;
const NOTIFICATION_TTL: Duration = Duration::from_secs(3);

/// Top-level application state and event loop.
pub struct App {
    cfg: Config,
    /// Project file; created on first save.
    path: PathBuf,
    controller: InteractionController,
    canvas: CanvasScreen,
    properties: PropertiesPanel,
    /// Modal form (port confirmation or node editor). Captures all keys.
    form: Option<FormDialog>,
    /// Last analysis answer, shown until dismissed.
    report: Option<String>,
    analyzing: bool,
    /// Store version at the last load or save.
    saved_version: u64,
    notification: Option<(Notification, Instant)>,
    help_visible: bool,
    running: bool,
    terminal_size: (u16, u16),
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
    /// Cancellation token for the data bridge task.
    data_cancel: CancellationToken,
}

impl App {
    pub fn new(cfg: Config, path: PathBuf) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let store = TopologyStore::with_spawn(cfg.canvas.spawn_point());
        let controller = InteractionController::new(store);
        let saved_version = controller.store().version();

        Self {
            canvas: CanvasScreen::new(cfg.canvas.badge_distance),
            properties: PropertiesPanel::new(),
            cfg,
            path,
            controller,
            form: None,
            report: None,
            analyzing: false,
            saved_version,
            notification: None,
            help_visible: false,
            running: true,
            terminal_size: (0, 0),
            action_tx,
            action_rx,
            data_cancel: CancellationToken::new(),
        }
    }

    /// Load the project file if there is one. A file that cannot be read
    /// leaves the canvas empty and says why.
    pub fn open_project(&mut self) {
        if !self.path.exists() {
            self.notify(Notification::info(format!(
                "New project: {}",
                self.project_name()
            )));
            return;
        }
        match self.load_project() {
            Ok(()) => {
                let nodes = self.controller.topology().nodes.len();
                self.notify(Notification::success(format!(
                    "Opened {} ({nodes} devices)",
                    self.project_name()
                )));
            }
            Err(e) => {
                warn!(error = %e, path = %self.path.display(), "could not open project");
                self.notify(Notification::error(format!("Could not open project: {e}")));
            }
        }
    }

    /// Run the main event loop.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;
        self.terminal_size = tui.size().unwrap_or((80, 24));
        self.apply_layout();

        {
            let topology = self.controller.store().subscribe();
            let selection = self.controller.subscribe_selection();
            let tx = self.action_tx.clone();
            let cancel = self.data_cancel.clone();
            tokio::spawn(async move {
                crate::data_bridge::run_data_bridge(topology, selection, tx, cancel).await;
            });
        }
        self.controller.set_transform(Some(self.canvas.transform()));

        let mut events = EventReader::new(Duration::from_millis(250));
        info!("TUI event loop started");

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            let action = match event {
                Event::Key(key) => self.handle_key_event(key)?,
                Event::Mouse(mouse) => self.handle_mouse_event(mouse)?,
                Event::Resize(w, h) => Some(Action::Resize(w, h)),
                Event::Tick => Some(Action::Tick),
            };
            if let Some(action) = action {
                self.action_tx.send(action)?;
            }

            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;
            }

            tui.draw(|frame| self.render(frame))?;
        }

        self.data_cancel.cancel();
        events.stop();
        info!("TUI event loop ended");
        Ok(())
    }

    // ── Input ────────────────────────────────────────────────────────

    /// Map a key to an action. Modal layers (form, report, help) capture
    /// every key; otherwise global keys win over the panels.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
            return Ok(Some(Action::Quit));
        }

        if let Some(form) = self.form.as_mut() {
            return Ok(match form.handle_key(key) {
                FormOutcome::Editing => None,
                FormOutcome::Closed(action) => {
                    self.form = None;
                    action
                }
            });
        }

        if self.report.is_some() {
            return Ok(Some(Action::DismissReport));
        }

        if self.help_visible {
            return match key.code {
                KeyCode::Esc | KeyCode::Char('?') => Ok(Some(Action::ToggleHelp)),
                _ => Ok(None),
            };
        }

        match (key.modifiers, key.code) {
            (KeyModifiers::NONE, KeyCode::Char('q')) => return Ok(Some(Action::Quit)),
            (KeyModifiers::NONE, KeyCode::Char('?')) => return Ok(Some(Action::ToggleHelp)),

            (KeyModifiers::NONE, KeyCode::Char(c @ '1'..='5')) => {
                if let Some(kind) = kind_for_key(c) {
                    return Ok(Some(Action::AddDevice(kind)));
                }
            }

            (KeyModifiers::NONE, KeyCode::Char('c')) => {
                return Ok(Some(Action::Gesture(Gesture::InvokeConnect)));
            }
            (KeyModifiers::NONE, KeyCode::Esc) => {
                return Ok(Some(Action::Gesture(Gesture::Escape)));
            }
            (KeyModifiers::NONE, KeyCode::Tab) => return Ok(Some(Action::CycleSelection)),
            (KeyModifiers::NONE, KeyCode::Char('d') | KeyCode::Delete) => {
                return Ok(Some(Action::DeleteSelected));
            }
            (KeyModifiers::NONE, KeyCode::Char('e')) => return Ok(Some(Action::OpenEditor)),
            (KeyModifiers::NONE, KeyCode::Char('s')) => return Ok(Some(Action::Save)),
            (KeyModifiers::NONE, KeyCode::Char('l')) => return Ok(Some(Action::Reload)),
            (KeyModifiers::NONE, KeyCode::Char('a')) => return Ok(Some(Action::Analyze)),
            _ => {}
        }

        if let Some(action) = self.properties.handle_key_event(key)? {
            return Ok(Some(action));
        }
        self.canvas.handle_key_event(key)
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        if self.form.is_some() || self.report.is_some() || self.help_visible {
            return Ok(None);
        }
        self.canvas.handle_mouse_event(mouse)
    }

    // ── Dispatch ─────────────────────────────────────────────────────

    /// Apply one action to the app, the controller and the panels.
    #[allow(clippy::too_many_lines)]
    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => self.running = false,

            Action::Tick => {
                if self
                    .notification
                    .as_ref()
                    .is_some_and(|(_, shown)| shown.elapsed() > NOTIFICATION_TTL)
                {
                    self.notification = None;
                }
            }

            Action::Resize(w, h) => {
                self.terminal_size = (*w, *h);
                self.apply_layout();
            }

            Action::TopologyUpdated(_) | Action::SelectionChanged(_) => {
                self.canvas.update(action)?;
                self.properties.update(action)?;
            }

            Action::InteractionChanged { .. } => {
                self.canvas.update(action)?;
            }

            Action::Gesture(gesture) => self.apply_gesture(gesture.clone()),

            Action::ViewportChanged(transform) => {
                self.controller.set_transform(Some(*transform));
            }

            Action::AddDevice(kind) => {
                let node = self.controller.add_device(*kind);
                debug!(id = %node.id, kind = %kind, "device added");
                self.close_port_form();
                self.sync_interaction();
            }

            Action::CycleSelection => {
                self.cycle_selection();
                self.sync_interaction();
            }

            Action::DeleteSelected => {
                if let Some(removal) = self.controller.delete_selected() {
                    self.notify(Notification::success(format!(
                        "Deleted {} and {} link(s)",
                        removal.node.name(),
                        removal.links.len()
                    )));
                    self.close_port_form();
                    self.sync_interaction();
                }
            }

            Action::SetOperatingSystem(id, os) => {
                match self.controller.set_operating_system(id, *os) {
                    Ok(dropped) if !dropped.is_empty() => {
                        let names: Vec<String> = dropped.iter().map(ToString::to_string).collect();
                        self.notify(Notification::info(format!(
                            "{os} does not run: {}",
                            names.join(", ")
                        )));
                    }
                    Ok(_) => {}
                    Err(e) => self.notify(Notification::error(e.to_string())),
                }
            }

            Action::ToggleService(id, service) => {
                if let Err(e) = self.controller.toggle_service(id, *service) {
                    self.notify(Notification::error(e.to_string()));
                }
            }

            Action::UpdateNodeConfig(id, config) => {
                if let Err(e) = self.controller.update_node_config(id, config.clone()) {
                    self.notify(Notification::error(e.to_string()));
                }
            }

            Action::OpenEditor => {
                if let Some(node) = self.controller.selected_node() {
                    self.form = Some(FormDialog::node_config(node));
                }
            }

            Action::Save => match codec::save_to_path(&self.path, self.controller.topology()) {
                Ok(()) => {
                    self.saved_version = self.controller.store().version();
                    self.notify(Notification::success(format!(
                        "Saved {}",
                        self.path.display()
                    )));
                }
                Err(e) => {
                    warn!(error = %e, "save failed");
                    self.notify(Notification::error(format!("Save failed: {e}")));
                }
            },

            Action::Reload => match self.load_project() {
                Ok(()) => {
                    self.form = None;
                    self.sync_interaction();
                    self.notify(Notification::success(format!(
                        "Reloaded {}",
                        self.project_name()
                    )));
                }
                Err(e) => {
                    self.notify(Notification::error(format!("Reload failed: {e}")));
                }
            },

            Action::Analyze => self.start_analysis(),

            Action::AnalysisFinished(message) => {
                self.analyzing = false;
                self.report = Some(message.clone());
            }

            Action::DismissReport => self.report = None,

            Action::ToggleHelp => self.help_visible = !self.help_visible,
        }
        Ok(())
    }

    /// Feed a gesture to the controller and follow up on the new state:
    /// open the port dialog when a link is pending, close it otherwise.
    fn apply_gesture(&mut self, gesture: Gesture) {
        if let Some(link) = self.controller.handle(gesture) {
            let topology = self.controller.topology();
            let name = |id: &EntityId| topology.node(id).map_or("?", Node::name);
            let message = format!(
                "Connected {}:{} <---> {}:{}",
                name(&link.source_id),
                link.source_port,
                name(&link.target_id),
                link.target_port
            );
            self.notify(Notification::success(message));
        }

        if let InteractionState::PendingPortConfirmation { source, target } =
            self.controller.state()
        {
            if self.form.is_none() {
                let topology = self.controller.topology();
                let name = |id: &EntityId| topology.node(id).map_or("?", Node::name);
                let defaults = self.controller.pending_port_defaults().unwrap_or_default();
                self.form = Some(FormDialog::ports(name(source), name(target), defaults));
            }
        } else {
            self.close_port_form();
        }

        self.sync_interaction();
    }

    /// Push the controller's state and draft line to the canvas.
    fn sync_interaction(&mut self) {
        let changed = Action::InteractionChanged {
            state: self.controller.state().clone(),
            draft: self.controller.draft_line(),
        };
        let _ = self.canvas.update(&changed);
    }

    fn close_port_form(&mut self) {
        if self
            .form
            .as_ref()
            .is_some_and(|f| *f.purpose() == FormPurpose::Ports)
        {
            self.form = None;
        }
    }

    /// Select the node after the current one, wrapping around.
    fn cycle_selection(&mut self) {
        let nodes = &self.controller.topology().nodes;
        let current = self
            .controller
            .selection()
            .and_then(|id| nodes.iter().position(|n| &n.id == id));
        let next = current.map_or(0, |i| i + 1);
        let Some(id) = nodes
            .get(next)
            .or_else(|| nodes.first())
            .map(|n| n.id.clone())
        else {
            return;
        };
        self.controller.select(&id);
    }

    fn load_project(&mut self) -> Result<(), CoreError> {
        let topology = codec::load_from_path(&self.path)?;
        self.controller.load(topology)?;
        self.saved_version = self.controller.store().version();
        Ok(())
    }

    /// Ask the review service in the background; the answer arrives as
    /// [`Action::AnalysisFinished`].
    fn start_analysis(&mut self) {
        if self.analyzing {
            return;
        }
        if let Err(e) = self.cfg.analysis.validate() {
            self.notify(Notification::error(e.to_string()));
            return;
        }
        self.analyzing = true;

        let analysis_cfg = self.cfg.analysis.clone();
        let topology = self.controller.store().snapshot();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            let message = match netsketch_config::analysis_client(&analysis_cfg) {
                Ok(client) => analysis::analyze_topology(client.as_ref(), &topology).await,
                Err(e) => {
                    warn!(error = %e, "could not build analysis client");
                    FAILURE_MESSAGE.to_owned()
                }
            };
            let _ = tx.send(Action::AnalysisFinished(message));
        });
    }

    fn notify(&mut self, notification: Notification) {
        self.notification = Some((notification, Instant::now()));
    }

    fn is_modified(&self) -> bool {
        self.controller.store().version() != self.saved_version
    }

    fn project_name(&self) -> String {
        self.path.file_name().map_or_else(
            || self.path.display().to_string(),
            |n| n.to_string_lossy().into_owned(),
        )
    }

    fn apply_layout(&mut self) {
        let (w, h) = self.terminal_size;
        let (canvas, _, _) = split(Rect::new(0, 0, w, h));
        self.canvas.set_layout(canvas);
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        let (canvas, panel, status) = split(area);

        self.canvas.render(frame, canvas);
        self.properties.render(frame, panel);
        self.render_status_bar(frame, status);

        if let Some((ref notification, _)) = self.notification {
            render_notification(frame, area, notification);
        }
        if let Some(form) = &self.form {
            form.render(frame, area);
        }
        if let Some(report) = &self.report {
            render_report(frame, area, report);
        }
        if self.help_visible {
            render_help_overlay(frame, area);
        }
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let saved = if self.is_modified() {
            Span::styled("● modified", Style::default().fg(theme::ELECTRIC_YELLOW))
        } else {
            Span::styled("● saved", Style::default().fg(theme::SUCCESS_GREEN))
        };

        let mode = match self.controller.state() {
            InteractionState::Idle | InteractionState::Selected(_) => "",
            InteractionState::Connecting { .. } => "  │ connect: click the target, Esc cancels",
            InteractionState::PendingPortConfirmation { .. } => "  │ confirm ports",
        };

        let mut spans = vec![
            Span::raw(" "),
            Span::styled(
                self.project_name(),
                Style::default()
                    .fg(theme::NEON_CYAN)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" "),
            saved,
            Span::styled(mode, Style::default().fg(theme::ELECTRIC_PURPLE)),
        ];
        if self.analyzing {
            spans.push(Span::styled(
                "  │ analyzing…",
                Style::default().fg(theme::ELECTRIC_YELLOW),
            ));
        }
        spans.push(Span::styled(
            "  │ ? help  s save  a analyze  q quit",
            theme::key_hint(),
        ));

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

/// Canvas, properties panel and status bar.
fn split(area: Rect) -> (Rect, Rect, Rect) {
    let [main, status] =
        Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(area);
    let [canvas, panel] =
        Layout::horizontal([Constraint::Min(20), Constraint::Length(PANEL_WIDTH)]).areas(main);
    (canvas, panel, status)
}

fn kind_for_key(c: char) -> Option<DeviceKind> {
    match c {
        '1' => Some(DeviceKind::Router),
        '2' => Some(DeviceKind::Switch),
        '3' => Some(DeviceKind::MultilayerSwitch),
        '4' => Some(DeviceKind::Server),
        '5' => Some(DeviceKind::PersonalComputer),
        _ => None,
    }
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(2));
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width, height)
}

fn render_report(frame: &mut Frame, area: Rect, report: &str) {
    let report_area = centered(area, 90, area.height.saturating_sub(4));
    frame.render_widget(Clear, report_area);

    let block = Block::default()
        .title(" Topology review ")
        .title_style(theme::title_style())
        .title_bottom(Line::from(Span::styled(" any key to close ", theme::key_hint())))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border_focused())
        .style(Style::default().bg(theme::BG_DARK));

    let paragraph = Paragraph::new(report.to_owned())
        .style(Style::default().fg(theme::DIM_WHITE))
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, report_area);
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let help_area = centered(area, 60, 24);
    frame.render_widget(Clear, help_area);

    let block = Block::default()
        .title(" Keyboard Shortcuts ")
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border_focused())
        .style(Style::default().bg(theme::BG_DARK));

    let inner = block.inner(help_area);
    frame.render_widget(block, help_area);

    let heading = |text: &'static str| {
        Line::from(Span::styled(text, Style::default().fg(theme::NEON_CYAN)))
    };
    let row = |key: &'static str, what: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {key:<10}"), theme::key_hint_key()),
            Span::styled(what, theme::key_hint()),
        ])
    };

    let help_text = vec![
        Line::from(""),
        heading("  Canvas"),
        row("click", "Select a device"),
        row("drag", "Move a device"),
        row("1-5", "Add router/switch/MLS/server/PC"),
        row("c", "Connect from the selection"),
        row("Esc", "Cancel / deselect"),
        row("Tab", "Select next device"),
        row("d Del", "Delete the selection"),
        row("←→↑↓", "Pan"),
        row("+ - 0", "Zoom in / out / reset"),
        Line::from(""),
        heading("  Selection"),
        row("e", "Edit name and addressing"),
        row("o", "Next operating system (servers)"),
        row("[ ] space", "Pick and toggle a service"),
        Line::from(""),
        heading("  Project"),
        row("s / l", "Save / reload from disk"),
        row("a", "Review the topology"),
        row("? / q", "This help / quit"),
    ];

    frame.render_widget(Paragraph::new(help_text), inner);
}

/// Toast in the bottom-right corner, above the status bar.
fn render_notification(frame: &mut Frame, area: Rect, notif: &Notification) {
    let msg_len = u16::try_from(notif.message.chars().count()).unwrap_or(u16::MAX);
    let width = msg_len
        .saturating_add(6)
        .clamp(20, 70)
        .min(area.width.saturating_sub(2));
    let height = 3u16;

    let x = area.width.saturating_sub(width + 1);
    let y = area.height.saturating_sub(height + 2);
    let toast_area = Rect::new(area.x + x, area.y + y, width, height);

    let (border_color, icon) = match notif.level {
        NotificationLevel::Success => (theme::SUCCESS_GREEN, "✓"),
        NotificationLevel::Error => (theme::ERROR_RED, "✗"),
        NotificationLevel::Info => (theme::NEON_CYAN, "·"),
    };

    frame.render_widget(Clear, toast_area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border_color))
        .style(Style::default().bg(theme::BG_DARK));

    let inner = block.inner(toast_area);
    frame.render_widget(block, toast_area);

    let line = Line::from(vec![
        Span::styled(format!(" {icon} "), Style::default().fg(border_color)),
        Span::styled(notif.message.clone(), Style::default().fg(theme::DIM_WHITE)),
    ]);
    frame.render_widget(Paragraph::new(line), inner);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn app_at(path: PathBuf) -> App {
        let mut app = App::new(Config::default(), path);
        app.open_project();
        app
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    /// Dispatch an action and everything it queues.
    fn dispatch(app: &mut App, action: Action) {
        app.process_action(&action).unwrap();
        while let Ok(next) = app.action_rx.try_recv() {
            app.process_action(&next).unwrap();
        }
    }

    fn press_key(app: &mut App, code: KeyCode) {
        if let Some(action) = app.handle_key_event(key(code)).unwrap() {
            dispatch(app, action);
        }
    }

    /// Router and switch, with the switch selected.
    fn two_devices(app: &mut App) -> (EntityId, EntityId) {
        press_key(app, KeyCode::Char('1'));
        press_key(app, KeyCode::Char('2'));
        let nodes = &app.controller.topology().nodes;
        (nodes[0].id.clone(), nodes[1].id.clone())
    }

    #[test]
    fn number_keys_add_devices_and_select_them() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_at(dir.path().join("lab.json"));
        let (_, switch) = two_devices(&mut app);

        assert_eq!(app.controller.topology().nodes.len(), 2);
        assert_eq!(app.controller.selection(), Some(&switch));
        assert!(app.is_modified());
    }

    #[test]
    fn connecting_opens_the_port_dialog_and_links_on_enter() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_at(dir.path().join("lab.json"));
        let (router, switch) = two_devices(&mut app);

        dispatch(&mut app, Action::Gesture(Gesture::PressNode(router.clone())));
        dispatch(&mut app, Action::Gesture(Gesture::PointerRelease));
        press_key(&mut app, KeyCode::Char('c'));
        assert!(app.controller.state().is_connecting());
        assert!(app.form.is_none());

        dispatch(&mut app, Action::Gesture(Gesture::PressNode(switch.clone())));
        assert!(app.controller.state().is_pending());
        assert_eq!(
            app.form.as_ref().map(|f| f.purpose().clone()),
            Some(FormPurpose::Ports)
        );

        // Keys go to the dialog, not the canvas shortcuts.
        press_key(&mut app, KeyCode::Char('q'));
        assert!(app.running);
        press_key(&mut app, KeyCode::Backspace);

        press_key(&mut app, KeyCode::Enter);
        assert!(app.form.is_none());
        let links = &app.controller.topology().links;
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].source_id, router);
        assert_eq!(links[0].target_id, switch);
        assert_eq!(links[0].source_port, "Gi0/0");
        assert_eq!(links[0].target_port, "Fa0/1");
    }

    #[test]
    fn escape_in_port_dialog_cancels_the_link() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_at(dir.path().join("lab.json"));
        let (router, switch) = two_devices(&mut app);

        dispatch(&mut app, Action::Gesture(Gesture::PressNode(router)));
        dispatch(&mut app, Action::Gesture(Gesture::PointerRelease));
        dispatch(&mut app, Action::Gesture(Gesture::InvokeConnect));
        dispatch(&mut app, Action::Gesture(Gesture::PressNode(switch)));
        press_key(&mut app, KeyCode::Esc);

        assert!(app.form.is_none());
        assert_eq!(app.controller.state(), &InteractionState::Idle);
        assert!(app.controller.topology().links.is_empty());
    }

    #[test]
    fn tab_cycles_selection_and_wraps() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_at(dir.path().join("lab.json"));
        let (router, switch) = two_devices(&mut app);

        press_key(&mut app, KeyCode::Tab);
        assert_eq!(app.controller.selection(), Some(&router));
        press_key(&mut app, KeyCode::Tab);
        assert_eq!(app.controller.selection(), Some(&switch));
    }

    #[test]
    fn delete_key_removes_the_selection() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_at(dir.path().join("lab.json"));
        let (router, _) = two_devices(&mut app);

        press_key(&mut app, KeyCode::Char('d'));
        let nodes = &app.controller.topology().nodes;
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].id, router);
        assert!(app.controller.selection().is_none());
    }

    #[test]
    fn save_then_open_restores_the_topology() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lab.json");
        let mut app = app_at(path.clone());
        two_devices(&mut app);

        press_key(&mut app, KeyCode::Char('s'));
        assert!(!app.is_modified());
        assert!(path.exists());

        let reopened = app_at(path);
        assert_eq!(
            reopened.controller.topology(),
            app.controller.topology()
        );
        assert!(!reopened.is_modified());
    }

    #[test]
    fn malformed_reload_keeps_the_current_canvas() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lab.json");
        let mut app = app_at(path.clone());
        two_devices(&mut app);
        std::fs::write(&path, "{ not json").unwrap();

        press_key(&mut app, KeyCode::Char('l'));

        assert_eq!(app.controller.topology().nodes.len(), 2);
        let (notification, _) = app.notification.as_ref().unwrap();
        assert_eq!(notification.level, NotificationLevel::Error);
    }

    #[test]
    fn editor_updates_the_selected_node() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_at(dir.path().join("lab.json"));
        let (_, switch) = two_devices(&mut app);

        press_key(&mut app, KeyCode::Char('e'));
        assert!(matches!(
            app.form.as_ref().map(FormDialog::purpose),
            Some(FormPurpose::NodeConfig(id)) if *id == switch
        ));
        app.handle_key_event(KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL))
            .unwrap();
        for c in "core".chars() {
            press_key(&mut app, KeyCode::Char(c));
        }
        press_key(&mut app, KeyCode::Enter);

        assert!(app.form.is_none());
        assert_eq!(app.controller.topology().node(&switch).unwrap().name(), "core");
    }

    #[test]
    fn missing_file_starts_empty_with_a_notice() {
        let dir = tempfile::tempdir().unwrap();
        let app = app_at(dir.path().join("fresh.json"));
        assert!(app.controller.topology().nodes.is_empty());
        let (notification, _) = app.notification.as_ref().unwrap();
        assert_eq!(notification.level, NotificationLevel::Info);
    }
}
