use crate::app::{AppState, SelectedNetwork, SessionState};
use crate::config::{self, IconSet};
use crate::event::Renderer;
use crate::input::Keymap;
use crate::ranking::RankedNetworkSet;
use crate::theme;
use crate::wifi::{LinkInfo, NetworkObservation};
use color_eyre::eyre::Result;
use ratatui::{
    Terminal,
    backend::Backend,
    prelude::*,
    widgets::{Block, BorderType, Borders, List, ListItem, ListState, Paragraph, Wrap},
};

/// Presentation settings fixed at startup
#[derive(Debug, Clone, Copy, Default)]
pub struct UiStyle {
    pub icons: IconSet,
    pub keymap: Keymap,
}

impl UiStyle {
    fn rescan_key(&self) -> &'static str {
        match self.keymap {
            Keymap::Desktop => "F5",
            Keymap::Cardputer => "r",
        }
    }

    fn back_key(&self) -> &'static str {
        match self.keymap {
            Keymap::Desktop => "esc",
            Keymap::Cardputer => "q",
        }
    }
}

/// Renderer drawing into a ratatui terminal
pub struct TerminalRenderer<B: Backend> {
    terminal: Terminal<B>,
    style: UiStyle,
}

impl<B: Backend> TerminalRenderer<B> {
    pub fn new(terminal: Terminal<B>, style: UiStyle) -> Self {
        Self { terminal, style }
    }

    #[cfg(test)]
    pub fn backend(&self) -> &B {
        self.terminal.backend()
    }
}

impl<B: Backend> Renderer for TerminalRenderer<B> {
    fn draw(&mut self, state: &AppState) -> Result<()> {
        let style = self.style;
        self.terminal.draw(|frame| render(frame, state, &style))?;
        Ok(())
    }

    fn draw_scanning(&mut self) -> Result<()> {
        let style = self.style;
        self.terminal.draw(|frame| render_scanning(frame, &style))?;
        Ok(())
    }
}

/// Draw the device frame and return the area inside it
fn screen(frame: &mut Frame, accent: Color) -> Rect {
    let area = frame.area();

    frame.render_widget(
        Block::default().style(Style::default().bg(theme::BACKGROUND).fg(theme::FOREGROUND)),
        area,
    );

    let height = config::SCREEN_HEIGHT.min(area.height);
    let width = config::SCREEN_WIDTH.min(area.width);

    let vertical = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height),
        Constraint::Fill(1),
    ])
    .split(area);
    let horizontal = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length(width),
        Constraint::Fill(1),
    ])
    .split(vertical[1]);
    let main_area = horizontal[1];

    let main_block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(accent))
        .title(format!(" WIFIPICK v{} ", env!("CARGO_PKG_VERSION")))
        .title_alignment(Alignment::Center)
        .title_style(Style::default().fg(theme::CYAN).add_modifier(Modifier::BOLD));

    frame.render_widget(main_block, main_area);

    main_area.inner(Margin {
        vertical: 1,
        horizontal: 1,
    })
}

/// Split the inner area into heading, rule, body and help bar
fn sections(inner: Rect) -> [Rect; 4] {
    let layout = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .split(inner);
    [layout[0], layout[1], layout[2], layout[3]]
}

fn heading(frame: &mut Frame, areas: &[Rect; 4], title: &str, rule: Color) {
    frame.render_widget(
        Paragraph::new(title).style(Style::default().add_modifier(Modifier::BOLD)),
        areas[0],
    );
    frame.render_widget(
        Paragraph::new("─".repeat(areas[1].width as usize)).style(Style::default().fg(rule)),
        areas[1],
    );
}

fn help(frame: &mut Frame, area: Rect, hints: &[(&str, &str)]) {
    let mut spans = Vec::new();
    for (i, (key, action)) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" • ", Style::default().fg(theme::DIMMED)));
        }
        spans.push(Span::styled(*key, Style::default().fg(theme::FOREGROUND)));
        spans.push(Span::styled(format!(" {action}"), Style::default().fg(theme::DIMMED)));
    }
    frame.render_widget(
        Paragraph::new(Line::from(spans)).alignment(Alignment::Center),
        area,
    );
}

pub fn render_scanning(frame: &mut Frame, _style: &UiStyle) {
    let inner = screen(frame, theme::YELLOW);
    let areas = sections(inner);
    heading(frame, &areas, "Scanning for Wi-Fi networks...", theme::YELLOW);
    frame.render_widget(
        Paragraph::new("Please wait a few seconds.").style(Style::default().fg(theme::DIMMED)),
        areas[2],
    );
}

pub fn render(frame: &mut Frame, state: &AppState, style: &UiStyle) {
    match &state.state {
        SessionState::NoNetworksFound => render_no_networks(frame, style),
        SessionState::SelectingNetwork { index } => {
            render_network_list(frame, &state.networks, *index, style)
        }
        SessionState::EnteringPassword { target, .. } => render_password(frame, target, style),
        SessionState::Connecting { target } => render_connecting(frame, target, style),
        SessionState::Connected { target, link } => {
            render_connected(frame, target, link.as_ref(), style)
        }
        SessionState::ConnectFailed { target } => render_failed(frame, target, style),
    }
}

fn render_no_networks(frame: &mut Frame, style: &UiStyle) {
    let inner = screen(frame, theme::DIMMED);
    let areas = sections(inner);
    heading(frame, &areas, "No networks found.", theme::RED);
    frame.render_widget(
        Paragraph::new(format!("Press {} to scan again.", style.rescan_key())),
        areas[2],
    );
    help(frame, areas[3], &[(style.rescan_key(), "rescan")]);
}

fn signal_bar(rssi: i32) -> (&'static str, Color) {
    if rssi >= config::RSSI_GOOD {
        ("▂▄▆█", theme::GREEN)
    } else if rssi >= config::RSSI_FAIR {
        ("▂▄▆ ", theme::YELLOW)
    } else {
        ("▂▄  ", theme::RED)
    }
}

fn network_line<'a>(network: &'a NetworkObservation, style: &UiStyle) -> Line<'a> {
    let icon = if network.security.is_open() {
        style.icons.open()
    } else {
        style.icons.locked()
    };
    let (bar, bar_color) = signal_bar(network.rssi);

    Line::from(vec![
        Span::raw(icon),
        Span::raw(network.ssid.as_str()),
        Span::styled(
            format!(" ({}dBm) {}", network.rssi, network.security),
            Style::default().fg(theme::DIMMED),
        ),
        Span::raw(" "),
        Span::styled(bar, Style::default().fg(bar_color)),
    ])
}

fn render_network_list(
    frame: &mut Frame,
    networks: &RankedNetworkSet,
    index: usize,
    style: &UiStyle,
) {
    let inner = screen(frame, theme::BLUE);
    let areas = sections(inner);
    heading(frame, &areas, "Select a Wi-Fi network:", theme::GREEN);

    let items: Vec<ListItem> = networks
        .iter()
        .map(|n| ListItem::new(network_line(n, style)))
        .collect();

    let list = List::new(items)
        .highlight_symbol(style.icons.highlight())
        .highlight_spacing(ratatui::widgets::HighlightSpacing::Always)
        .highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .bg(theme::SELECTION_BG),
        );
    let mut list_state = ListState::default().with_selected(Some(index));
    frame.render_stateful_widget(list, areas[2], &mut list_state);

    help(
        frame,
        areas[3],
        &[
            ("↑/↓", "move"),
            (style.icons.enter(), "connect"),
            (style.rescan_key(), "rescan"),
        ],
    );
}

fn render_password(frame: &mut Frame, target: &SelectedNetwork, style: &UiStyle) {
    let inner = screen(frame, theme::YELLOW);
    let areas = sections(inner);
    heading(frame, &areas, &target.ssid, theme::GREEN);

    let body = if target.is_open {
        vec![
            Line::from("Open network (no password)."),
            Line::from(""),
            Line::from(format!("{} to connect.", style.icons.enter())),
        ]
    } else {
        // Shown as typed: the device screen is not shared
        vec![
            Line::from(format!("Password for {} network:", target.security)),
            Line::from(""),
            Line::from(vec![
                Span::raw(target.password.as_str()),
                Span::styled(" ", Style::default().bg(theme::FOREGROUND)),
            ]),
        ]
    };
    frame.render_widget(Paragraph::new(body).wrap(Wrap { trim: false }), areas[2]);

    let mut hints = vec![(style.icons.enter(), "connect")];
    if !target.is_open {
        hints.push(("del", "erase"));
    }
    hints.push((style.back_key(), "back"));
    help(frame, areas[3], &hints);
}

fn render_connecting(frame: &mut Frame, target: &SelectedNetwork, style: &UiStyle) {
    let inner = screen(frame, theme::YELLOW);
    let areas = sections(inner);
    heading(frame, &areas, "Connecting to:", theme::YELLOW);
    frame.render_widget(
        Paragraph::new(vec![
            Line::from(Span::styled(
                target.ssid.as_str(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled("Please wait...", Style::default().fg(theme::DIMMED))),
        ]),
        areas[2],
    );
    help(frame, areas[3], &[(style.rescan_key(), "cancel and rescan")]);
}

fn render_connected(
    frame: &mut Frame,
    target: &SelectedNetwork,
    link: Option<&LinkInfo>,
    style: &UiStyle,
) {
    let inner = screen(frame, theme::GREEN);
    let areas = sections(inner);
    heading(
        frame,
        &areas,
        &format!("{}Wi-Fi connected!", style.icons.connected()),
        theme::GREEN,
    );

    let label = Style::default().fg(theme::CYAN);
    let ssid = link.map_or(target.ssid.as_str(), |l| l.ssid.as_str());
    let mut info = vec![Line::from(vec![
        Span::styled("SSID:  ", label),
        Span::raw(ssid),
    ])];

    let ip = link
        .and_then(|l| l.ip)
        .map_or_else(|| "unknown".to_string(), |ip| ip.to_string());
    info.push(Line::from(vec![Span::styled("IP:    ", label), Span::raw(ip)]));

    if let Some(bssid) = link.and_then(LinkInfo::bssid_string) {
        info.push(Line::from(vec![Span::styled("BSSID: ", label), Span::raw(bssid)]));
    }
    if let Some(speed) = link.and_then(|l| l.link_speed) {
        info.push(Line::from(vec![
            Span::styled("Speed: ", label),
            Span::raw(format!("{speed} Mbps")),
        ]));
    }

    frame.render_widget(Paragraph::new(info), areas[2]);
    help(frame, areas[3], &[(style.rescan_key(), "disconnect and rescan")]);
}

fn render_failed(frame: &mut Frame, target: &SelectedNetwork, style: &UiStyle) {
    let inner = screen(frame, theme::RED);
    let areas = sections(inner);
    heading(
        frame,
        &areas,
        &format!("{}Connection failed.", style.icons.failed()),
        theme::RED,
    );
    frame.render_widget(
        Paragraph::new(vec![
            Line::from(target.ssid.as_str()),
            Line::from(""),
            Line::from("Check the network name and password."),
        ])
        .wrap(Wrap { trim: false }),
        areas[2],
    );
    help(frame, areas[3], &[(style.rescan_key(), "try again")]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wifi::SecurityClass;
    use ratatui::backend::TestBackend;
    use std::net::Ipv4Addr;

    fn ascii() -> UiStyle {
        UiStyle {
            icons: IconSet::Ascii,
            keymap: Keymap::Desktop,
        }
    }

    fn screen_text(renderer: &TerminalRenderer<TestBackend>) -> String {
        let buffer = renderer.backend().buffer();
        let width = buffer.area.width as usize;
        buffer
            .content()
            .chunks(width)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn draw(state: &AppState) -> String {
        let terminal = Terminal::new(TestBackend::new(60, 22)).unwrap();
        let mut renderer = TerminalRenderer::new(terminal, ascii());
        renderer.draw(state).unwrap();
        screen_text(&renderer)
    }

    fn target(ssid: &str, security: SecurityClass) -> SelectedNetwork {
        SelectedNetwork::from_observation(&NetworkObservation::new(ssid, -50, security))
    }

    #[test]
    fn list_shows_ranked_entries_and_marker() {
        let mut state = AppState::new();
        state
            .networks
            .offer(NetworkObservation::new("Home", -42, SecurityClass::Wpa2));
        state
            .networks
            .offer(NetworkObservation::new("Cafe", -70, SecurityClass::Open));
        state.set_state(SessionState::SelectingNetwork { index: 1 });

        let text = draw(&state);
        assert!(text.contains("Select a Wi-Fi network:"));
        assert!(text.contains("[*] Home (-42dBm) WPA2"));
        assert!(text.contains("> [O] Cafe (-70dBm) Open"));
        assert!(text.find("Home").unwrap() < text.find("Cafe").unwrap());
    }

    #[test]
    fn password_is_shown_as_typed() {
        let mut state = AppState::new();
        let mut locked = target("Home", SecurityClass::Wpa3);
        locked.password.push_str("hunter2");
        state.set_state(SessionState::EnteringPassword {
            target: locked,
            index: 0,
        });

        let text = draw(&state);
        assert!(text.contains("Password for WPA3 network:"));
        assert!(text.contains("hunter2"));
        assert!(text.contains("del erase"));
    }

    #[test]
    fn open_network_needs_no_password() {
        let mut state = AppState::new();
        state.set_state(SessionState::EnteringPassword {
            target: target("Cafe", SecurityClass::Open),
            index: 0,
        });

        let text = draw(&state);
        assert!(text.contains("Open network (no password)."));
        assert!(!text.contains("del erase"));
    }

    #[test]
    fn connected_screen_shows_address() {
        let mut state = AppState::new();
        state.set_state(SessionState::Connected {
            target: target("Cafe", SecurityClass::Open),
            link: Some(LinkInfo {
                ssid: "Cafe".to_string(),
                ip: Some(Ipv4Addr::new(192, 168, 4, 12)),
                bssid: Some([0x02, 0, 0x5e, 0x10, 0, 2]),
                link_speed: Some(72),
            }),
        });

        let text = draw(&state);
        assert!(text.contains("[+] Wi-Fi connected!"));
        assert!(text.contains("IP:    192.168.4.12"));
        assert!(text.contains("BSSID: 02:00:5E:10:00:02"));
        assert!(text.contains("72 Mbps"));
    }

    #[test]
    fn remaining_screens_render() {
        let mut state = AppState::new();
        assert!(draw(&state).contains("No networks found."));

        state.set_state(SessionState::Connecting {
            target: target("Home", SecurityClass::Wpa2),
        });
        assert!(draw(&state).contains("Connecting to:"));

        state.set_state(SessionState::ConnectFailed {
            target: target("Home", SecurityClass::Wpa2),
        });
        let text = draw(&state);
        assert!(text.contains("[x] Connection failed."));
        assert!(text.contains("F5 try again"));
    }

    #[test]
    fn scanning_splash() {
        let terminal = Terminal::new(TestBackend::new(60, 22)).unwrap();
        let mut renderer = TerminalRenderer::new(terminal, ascii());
        renderer.draw_scanning().unwrap();
        assert!(screen_text(&renderer).contains("Scanning for Wi-Fi networks..."));
    }

    #[test]
    fn tiny_terminal_does_not_panic() {
        let mut state = AppState::new();
        state
            .networks
            .offer(NetworkObservation::new("Home", -42, SecurityClass::Wpa2));
        state.set_state(SessionState::SelectingNetwork { index: 0 });
        let terminal = Terminal::new(TestBackend::new(8, 3)).unwrap();
        let mut renderer = TerminalRenderer::new(terminal, ascii());
        renderer.draw(&state).unwrap();
    }
}
