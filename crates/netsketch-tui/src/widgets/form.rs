//! Modal form dialog shared by the port confirmation and the node editor.
//!
//! Each field is a [`tui_input::Input`]; keys are translated into
//! [`InputRequest`]s here so the dialog does not depend on a particular
//! crossterm version inside `tui-input`.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph};
use tui_input::{Input, InputRequest};

use netsketch_core::{EntityId, Gesture, Node, NodeConfig};

use crate::action::Action;
use crate::theme;

/// What a submitted form turns into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormPurpose {
    /// Port labels for the pending link.
    Ports,
    /// Name and addressing of a node.
    NodeConfig(EntityId),
}

/// Result of feeding a key to the dialog.
#[derive(Debug)]
pub enum FormOutcome {
    /// Still editing.
    Editing,
    /// Closed; dispatch the action if there is one.
    Closed(Option<Action>),
}

struct FormField {
    label: String,
    input: Input,
}

pub struct FormDialog {
    title: String,
    purpose: FormPurpose,
    fields: Vec<FormField>,
    focus: usize,
    /// Node config the editor started from; untouched fields keep their values.
    base: Option<NodeConfig>,
}

impl FormDialog {
    /// Port dialog for a pending link, prefilled with suggested labels.
    pub fn ports(source: &str, target: &str, defaults: (String, String)) -> Self {
        Self {
            title: format!("Connect {source} <---> {target}"),
            purpose: FormPurpose::Ports,
            fields: vec![
                FormField {
                    label: format!("{source} port"),
                    input: Input::new(defaults.0),
                },
                FormField {
                    label: format!("{target} port"),
                    input: Input::new(defaults.1),
                },
            ],
            focus: 0,
            base: None,
        }
    }

    /// Editor for a node's name, address, mask and gateway.
    pub fn node_config(node: &Node) -> Self {
        let cfg = &node.config;
        let field = |label: &str, value: &str| FormField {
            label: label.to_owned(),
            input: Input::new(value.to_owned()),
        };
        Self {
            title: format!("Edit {}", cfg.name),
            purpose: FormPurpose::NodeConfig(node.id.clone()),
            fields: vec![
                field("Name", &cfg.name),
                field("IP address", &cfg.ip_address),
                field("Subnet mask", &cfg.subnet_mask),
                field("Gateway (empty for none)", cfg.gateway.as_deref().unwrap_or("")),
            ],
            focus: 0,
            base: Some(cfg.clone()),
        }
    }

    pub fn purpose(&self) -> &FormPurpose {
        &self.purpose
    }

    fn value(&self, index: usize) -> &str {
        self.fields.get(index).map_or("", |f| f.input.value())
    }

    fn submit(&self) -> Option<Action> {
        match &self.purpose {
            FormPurpose::Ports => Some(Action::Gesture(Gesture::ConfirmPorts {
                source_port: self.value(0).trim().to_owned(),
                target_port: self.value(1).trim().to_owned(),
            })),
            FormPurpose::NodeConfig(id) => {
                let mut config = self.base.clone()?;
                config.name = self.value(0).trim().to_owned();
                config.ip_address = self.value(1).trim().to_owned();
                config.subnet_mask = self.value(2).trim().to_owned();
                let gateway = self.value(3).trim();
                config.gateway = (!gateway.is_empty()).then(|| gateway.to_owned());
                Some(Action::UpdateNodeConfig(id.clone(), config))
            }
        }
    }

    fn cancel(&self) -> Option<Action> {
        match self.purpose {
            FormPurpose::Ports => Some(Action::Gesture(Gesture::CancelPorts)),
            FormPurpose::NodeConfig(_) => None,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> FormOutcome {
        let count = self.fields.len().max(1);
        let request = match (key.modifiers, key.code) {
            (_, KeyCode::Enter) => return FormOutcome::Closed(self.submit()),
            (_, KeyCode::Esc) => return FormOutcome::Closed(self.cancel()),
            (_, KeyCode::Tab | KeyCode::Down) => {
                self.focus = (self.focus + 1) % count;
                return FormOutcome::Editing;
            }
            (_, KeyCode::BackTab | KeyCode::Up) => {
                self.focus = (self.focus + count - 1) % count;
                return FormOutcome::Editing;
            }
            (KeyModifiers::CONTROL, KeyCode::Char('u')) => InputRequest::DeleteLine,
            (KeyModifiers::CONTROL, KeyCode::Char('w')) => InputRequest::DeletePrevWord,
            (KeyModifiers::CONTROL, _) => return FormOutcome::Editing,
            (_, KeyCode::Char(c)) => InputRequest::InsertChar(c),
            (_, KeyCode::Backspace) => InputRequest::DeletePrevChar,
            (_, KeyCode::Delete) => InputRequest::DeleteNextChar,
            (_, KeyCode::Left) => InputRequest::GoToPrevChar,
            (_, KeyCode::Right) => InputRequest::GoToNextChar,
            (_, KeyCode::Home) => InputRequest::GoToStart,
            (_, KeyCode::End) => InputRequest::GoToEnd,
            _ => return FormOutcome::Editing,
        };
        if let Some(field) = self.fields.get_mut(self.focus) {
            field.input.handle(request);
        }
        FormOutcome::Editing
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let field_rows = u16::try_from(self.fields.len()).unwrap_or(u16::MAX);
        let panel_w = 52u16.min(area.width.saturating_sub(4));
        let panel_h = (field_rows.saturating_mul(4) + 4).min(area.height.saturating_sub(2));
        let x = area.x + (area.width.saturating_sub(panel_w)) / 2;
        let y = area.y + (area.height.saturating_sub(panel_h)) / 2;
        let panel = Rect::new(x, y, panel_w, panel_h);

        frame.render_widget(Clear, panel);
        let block = Block::default()
            .title(Line::from(vec![
                Span::raw(" "),
                Span::styled(
                    self.title.clone(),
                    Style::default()
                        .fg(theme::NEON_CYAN)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(" "),
            ]))
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme::ELECTRIC_PURPLE))
            .style(Style::default().bg(theme::BG_DARK));
        let inner = block.inner(panel);
        frame.render_widget(block, panel);

        let mut row = inner.y;
        for (i, field) in self.fields.iter().enumerate() {
            if row + 4 > inner.y + inner.height {
                break;
            }
            let area = Rect::new(inner.x + 1, row, inner.width.saturating_sub(2), 4);
            Self::render_field(frame, area, field, i == self.focus);
            row += 4;
        }

        let hints = Rect::new(inner.x, inner.y + inner.height.saturating_sub(1), inner.width, 1);
        frame.render_widget(
            Paragraph::new(Span::styled(
                "Tab next field  Enter confirm  Esc cancel",
                theme::key_hint(),
            ))
            .alignment(Alignment::Center),
            hints,
        );
    }

    fn render_field(frame: &mut Frame, area: Rect, field: &FormField, active: bool) {
        let label_style = if active {
            Style::default().fg(theme::NEON_CYAN)
        } else {
            Style::default().fg(theme::DIM_WHITE)
        };
        frame.render_widget(
            Paragraph::new(Span::styled(field.label.clone(), label_style)),
            Rect::new(area.x, area.y, area.width, 1),
        );

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(if active {
                theme::ELECTRIC_PURPLE
            } else {
                theme::BORDER_GRAY
            }));
        let box_area = Rect::new(area.x, area.y + 1, area.width, 3);
        let inner = block.inner(box_area);
        frame.render_widget(block, box_area);

        let width = usize::from(inner.width.max(1));
        let scroll = field.input.visual_scroll(width.saturating_sub(1));
        frame.render_widget(
            Paragraph::new(Span::styled(
                field.input.value().to_owned(),
                Style::default().fg(theme::NEON_CYAN),
            ))
            .scroll((0, u16::try_from(scroll).unwrap_or(u16::MAX))),
            inner,
        );

        if active {
            let offset = field.input.visual_cursor().saturating_sub(scroll);
            let cursor_x = inner.x + u16::try_from(offset).unwrap_or(0);
            frame.set_cursor_position((cursor_x.min(inner.x + inner.width), inner.y));
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use netsketch_core::{DeviceKind, TopologyStore};
    use pretty_assertions::assert_eq;

    fn press(form: &mut FormDialog, code: KeyCode) -> FormOutcome {
        form.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_text(form: &mut FormDialog, text: &str) {
        for c in text.chars() {
            press(form, KeyCode::Char(c));
        }
    }

    #[test]
    fn port_dialog_confirms_prefilled_defaults() {
        let mut form = FormDialog::ports("R-1", "S-1", ("Gi0/0".into(), "Fa0/1".into()));
        match press(&mut form, KeyCode::Enter) {
            FormOutcome::Closed(Some(Action::Gesture(Gesture::ConfirmPorts {
                source_port,
                target_port,
            }))) => {
                assert_eq!(source_port, "Gi0/0");
                assert_eq!(target_port, "Fa0/1");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn tab_switches_fields_before_editing() {
        let mut form = FormDialog::ports("R-1", "S-1", ("Gi0/0".into(), "Fa0/1".into()));
        press(&mut form, KeyCode::Tab);
        press(&mut form, KeyCode::Backspace);
        type_text(&mut form, "9");
        assert_eq!(form.value(0), "Gi0/0");
        assert_eq!(form.value(1), "Fa0/9");
    }

    #[test]
    fn escape_cancels_ports() {
        let mut form = FormDialog::ports("a", "b", ("x".into(), "y".into()));
        assert!(matches!(
            press(&mut form, KeyCode::Esc),
            FormOutcome::Closed(Some(Action::Gesture(Gesture::CancelPorts)))
        ));
    }

    #[test]
    fn node_editor_keeps_unedited_settings() {
        let mut store = TopologyStore::new();
        let mut node = store.add_node(DeviceKind::Server);
        node.config.vlan = Some(20);

        let mut form = FormDialog::node_config(&node);
        assert_eq!(form.purpose(), &FormPurpose::NodeConfig(node.id.clone()));

        form.handle_key(KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL));
        type_text(&mut form, "web");
        press(&mut form, KeyCode::Tab);
        press(&mut form, KeyCode::Tab);
        press(&mut form, KeyCode::Tab);
        type_text(&mut form, " 10.0.0.1 ");

        match press(&mut form, KeyCode::Enter) {
            FormOutcome::Closed(Some(Action::UpdateNodeConfig(id, config))) => {
                assert_eq!(id, node.id);
                assert_eq!(config.name, "web");
                assert_eq!(config.ip_address, "192.168.1.1");
                assert_eq!(config.gateway.as_deref(), Some("10.0.0.1"));
                assert_eq!(config.vlan, Some(20));
                assert_eq!(config.os, node.config.os);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn empty_gateway_clears_it() {
        let mut store = TopologyStore::new();
        let mut node = store.add_node(DeviceKind::Router);
        node.config.gateway = Some("10.0.0.254".into());

        let mut form = FormDialog::node_config(&node);
        for _ in 0..3 {
            press(&mut form, KeyCode::Tab);
        }
        form.handle_key(KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL));

        match press(&mut form, KeyCode::Enter) {
            FormOutcome::Closed(Some(Action::UpdateNodeConfig(_, config))) => {
                assert_eq!(config.gateway, None);
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
