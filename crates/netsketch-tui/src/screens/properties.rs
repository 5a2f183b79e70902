//! Properties panel — configuration, services and cabling of the
//! selected node.

use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Wrap};
use strum::IntoEnumIterator;

use netsketch_core::{EntityId, Node, OperatingSystem, Service, Topology, policy};

use crate::action::Action;
use crate::component::Component;
use crate::theme;

pub struct PropertiesPanel {
    topology: Arc<Topology>,
    selection: Option<EntityId>,
    /// Highlighted row in the service list.
    service_cursor: usize,
}

impl PropertiesPanel {
    pub fn new() -> Self {
        Self {
            topology: Arc::new(Topology::default()),
            selection: None,
            service_cursor: 0,
        }
    }

    fn selected(&self) -> Option<&Node> {
        self.topology.node(self.selection.as_ref()?)
    }

    /// Services the selected node's OS allows, in presentation order.
    /// Empty for kinds that do not host services.
    fn offered_services(&self) -> &'static [Service] {
        match self.selected() {
            Some(node) if node.kind.hosts_services() => {
                policy::allowed_services(node.config.operating_system())
            }
            _ => &[],
        }
    }

    fn highlighted_service(&self) -> Option<Service> {
        self.offered_services().get(self.service_cursor).copied()
    }

    fn move_cursor(&mut self, forward: bool) {
        let len = self.offered_services().len();
        if len == 0 {
            return;
        }
        self.service_cursor = if forward {
            (self.service_cursor + 1) % len
        } else {
            (self.service_cursor + len - 1) % len
        };
    }

    fn clamp_cursor(&mut self) {
        let len = self.offered_services().len();
        self.service_cursor = self.service_cursor.min(len.saturating_sub(1));
    }

    fn node_lines(&self, node: &Node) -> Vec<Line<'static>> {
        let cfg = &node.config;
        let field = |label: &str, value: String| {
            Line::from(vec![
                Span::styled(format!(" {label:<9}"), theme::label()),
                Span::styled(value, theme::value()),
            ])
        };

        let mut lines = vec![
            Line::from(Span::styled(
                format!(" {}", cfg.name),
                Style::default()
                    .fg(theme::device_color(node.kind))
                    .add_modifier(ratatui::style::Modifier::BOLD),
            )),
            field("Type", format!("{} ({})", node.kind.label(), node.kind)),
            field("IP", cfg.ip_address.clone()),
            field("Mask", cfg.subnet_mask.clone()),
            field("Gateway", cfg.gateway.clone().unwrap_or_else(|| "-".into())),
            field(
                "VLAN",
                cfg.vlan.map_or_else(|| "-".into(), |v| v.to_string()),
            ),
            field("Position", format!("{:.0}, {:.0}", node.x, node.y)),
        ];

        if node.kind.hosts_services() {
            lines.push(Line::from(""));
            lines.push(field("OS", cfg.operating_system().to_string()));
            lines.push(Line::from(Span::styled(" Services", theme::label())));
            let offered = self.offered_services();
            if offered.is_empty() {
                lines.push(Line::from(Span::styled(
                    "   none available on this OS",
                    theme::key_hint(),
                )));
            }
            for (i, service) in offered.iter().enumerate() {
                let mark = if cfg.has_service(*service) { "[x]" } else { "[ ]" };
                let style = if i == self.service_cursor {
                    theme::row_selected()
                } else {
                    theme::value()
                };
                lines.push(Line::from(Span::styled(format!("   {mark} {service}"), style)));
            }
        }

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(" Links", theme::label())));
        let mut any = false;
        for link in self.topology.links_of(&node.id) {
            let (Some(peer), Some(local_port)) = (link.other_end(&node.id), link.port_on(&node.id))
            else {
                continue;
            };
            let peer_name = self.topology.node(peer).map_or("?", Node::name);
            let peer_port = link.port_on(peer).unwrap_or("?");
            lines.push(Line::from(vec![
                Span::styled(format!("   {local_port}"), Style::default().fg(theme::ELECTRIC_PURPLE)),
                Span::styled(" → ", theme::key_hint()),
                Span::styled(format!("{peer_name}:{peer_port}"), theme::value()),
            ]));
            any = true;
        }
        if !any {
            lines.push(Line::from(Span::styled("   not connected", theme::key_hint())));
        }
        lines
    }
}

/// Next OS in the `o` cycle.
fn next_os(current: OperatingSystem) -> OperatingSystem {
    let all: Vec<OperatingSystem> = OperatingSystem::iter().collect();
    let pos = all.iter().position(|os| *os == current).unwrap_or(0);
    all.get((pos + 1) % all.len()).copied().unwrap_or(current)
}

impl Component for PropertiesPanel {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let Some(node) = self.selected() else {
            return Ok(None);
        };
        let id = node.id.clone();
        let hosts = node.kind.hosts_services();
        let os = node.config.operating_system();

        let action = match key.code {
            KeyCode::Char(']') => {
                self.move_cursor(true);
                None
            }
            KeyCode::Char('[') => {
                self.move_cursor(false);
                None
            }
            KeyCode::Char(' ') => self
                .highlighted_service()
                .map(|service| Action::ToggleService(id, service)),
            KeyCode::Char('o') if hosts => Some(Action::SetOperatingSystem(id, next_os(os))),
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::TopologyUpdated(topology) => {
                self.topology = Arc::clone(topology);
                self.clamp_cursor();
            }
            Action::SelectionChanged(selection) => {
                if *selection != self.selection {
                    self.service_cursor = 0;
                }
                self.selection.clone_from(selection);
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Properties ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.selection.is_some() {
                theme::border_focused()
            } else {
                theme::border_default()
            });

        let lines = match self.selected() {
            Some(node) => self.node_lines(node),
            None => vec![
                Line::from(""),
                Line::from(Span::styled(" Click a device or press", theme::key_hint())),
                Line::from(Span::styled(" Tab to select one.", theme::key_hint())),
            ],
        };

        let mut footer = Vec::new();
        if let Some(node) = self.selected() {
            footer.push(Line::from(""));
            footer.push(Line::from(vec![
                Span::styled(" e ", theme::key_hint_key()),
                Span::styled("edit  ", theme::key_hint()),
                Span::styled("d ", theme::key_hint_key()),
                Span::styled("delete", theme::key_hint()),
            ]));
            if node.kind.hosts_services() {
                footer.push(Line::from(vec![
                    Span::styled(" o ", theme::key_hint_key()),
                    Span::styled("OS  ", theme::key_hint()),
                    Span::styled("[ ] ", theme::key_hint_key()),
                    Span::styled("move  ", theme::key_hint()),
                    Span::styled("space ", theme::key_hint_key()),
                    Span::styled("toggle", theme::key_hint()),
                ]));
            }
        }

        let paragraph = Paragraph::new([lines, footer].concat())
            .block(block)
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, area);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use netsketch_core::{DeviceKind, TopologyStore};
    use pretty_assertions::assert_eq;

    fn key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    fn panel_showing(kind: DeviceKind) -> (PropertiesPanel, TopologyStore, EntityId) {
        let mut store = TopologyStore::new();
        let node = store.add_node(kind);
        let mut panel = PropertiesPanel::new();
        panel.update(&Action::TopologyUpdated(store.snapshot())).unwrap();
        panel
            .update(&Action::SelectionChanged(Some(node.id.clone())))
            .unwrap();
        (panel, store, node.id)
    }

    #[test]
    fn server_lists_only_services_its_os_allows() {
        let (panel, _, _) = panel_showing(DeviceKind::Server);
        assert_eq!(
            panel.offered_services(),
            policy::allowed_services(OperatingSystem::Linux)
        );
        assert!(!panel.offered_services().contains(&Service::DirectoryService));
    }

    #[test]
    fn space_toggles_the_highlighted_service() {
        let (mut panel, _, id) = panel_showing(DeviceKind::Server);
        panel.handle_key_event(key(']')).unwrap();
        let expected = policy::allowed_services(OperatingSystem::Linux)[1];
        let action = panel.handle_key_event(key(' ')).unwrap();
        assert!(matches!(action, Some(Action::ToggleService(n, s)) if n == id && s == expected));
    }

    #[test]
    fn cursor_wraps_backwards() {
        let (mut panel, _, _) = panel_showing(DeviceKind::Server);
        panel.handle_key_event(key('[')).unwrap();
        assert_eq!(
            panel.service_cursor,
            policy::allowed_services(OperatingSystem::Linux).len() - 1
        );
    }

    #[test]
    fn os_key_cycles_for_servers_only() {
        let (mut panel, _, id) = panel_showing(DeviceKind::Server);
        let action = panel.handle_key_event(key('o')).unwrap();
        assert!(matches!(
            action,
            Some(Action::SetOperatingSystem(n, OperatingSystem::WindowsServer)) if n == id
        ));

        let (mut router_panel, _, _) = panel_showing(DeviceKind::Router);
        assert!(router_panel.handle_key_event(key('o')).unwrap().is_none());
        assert!(router_panel.handle_key_event(key(' ')).unwrap().is_none());
    }

    #[test]
    fn os_cycle_wraps_through_none() {
        assert_eq!(next_os(OperatingSystem::WindowsServer), OperatingSystem::None);
        assert_eq!(next_os(OperatingSystem::None), OperatingSystem::Linux);
    }

    #[test]
    fn cursor_is_clamped_when_the_list_shrinks() {
        let (mut panel, mut store, id) = panel_showing(DeviceKind::Server);
        for _ in 0..5 {
            panel.handle_key_event(key(']')).unwrap();
        }
        store
            .set_operating_system(&id, OperatingSystem::None)
            .unwrap();
        panel.update(&Action::TopologyUpdated(store.snapshot())).unwrap();
        assert_eq!(panel.service_cursor, 0);
        assert!(panel.highlighted_service().is_none());
    }
}
