//! # Widgets Example
//!
//! A radio group, a tab bar and a button driven from the terminal:
//! - `Tab`/`Shift+Tab` move focus
//! - `Space` checks the focused radio or selects the focused tab
//! - `Enter` selects a tab or presses the button
//! - mouse clicks work on every widget
//!
//! Set `RUST_LOG=debug` to see coordination decisions in `widgets.log`.
//!
//! Run with: `cargo run --example widgets`

use futures::StreamExt;
use oxy::crossterm::event::{DisableMouseCapture, EnableMouseCapture, EventStream};
use oxy::crossterm::execute;
use oxy::widgets::attr::{ACTIVE, CHECKED, DISABLED};
use oxy::widgets::{Button, Orientation, Radio, RadioGroup, Tab, Tabs};
use oxy::{Document, Driver, EventType, NodeId};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;
use std::io::stdout;

/// Where each interactive node is drawn: (row, first column, last column).
type Hotspots = Vec<(u16, u16, u16, NodeId)>;

struct Demo {
    group: RadioGroup,
    radios: Vec<(Radio, &'static str)>,
    tabs: Tabs,
    tab_labels: Vec<(Tab, &'static str)>,
    reset: Button,
}

fn build(doc: &mut Document) -> Result<Demo, oxy::DomError> {
    let root = doc.root();

    let group = RadioGroup::create(doc)?;
    let mut radios = Vec::new();
    for label in ["Margherita", "Funghi", "Quattro formaggi", "Hawaii (sold out)"] {
        let radio = Radio::create(doc)?;
        let text = doc.create_text(label);
        doc.append_child(radio.node(), text)?;
        doc.append_child(group.node(), radio.node())?;
        radios.push((radio, label));
    }
    if let Some((sold_out, _)) = radios.last() {
        sold_out.set_disabled(doc, true);
    }
    doc.append_child(root, group.node())?;

    let tabs = Tabs::create(doc)?;
    tabs.set_orientation(doc, Orientation::Horizontal);
    let mut tab_labels = Vec::new();
    for label in ["Small", "Medium", "Large"] {
        let tab = Tab::create(doc)?;
        doc.append_child(tabs.node(), tab.node())?;
        tab_labels.push((tab, label));
    }
    tabs.set_selected_index(doc, 1);
    doc.append_child(root, tabs.node())?;

    let reset = Button::create(doc)?;
    doc.append_child(root, reset.node())?;
    let radio_nodes: Vec<NodeId> = radios.iter().map(|(r, _)| r.node()).collect();
    doc.add_listener(reset.node(), EventType::Click, move |doc, _| {
        for &node in &radio_nodes {
            doc.toggle_attribute(node, CHECKED, false);
        }
    })?;

    Ok(Demo {
        group,
        radios,
        tabs,
        tab_labels,
        reset,
    })
}

const RESET_LABEL: &str = "[ Reset ]";

fn hotspots(demo: &Demo) -> Hotspots {
    // Rows are relative to the frame; the block border takes row 0 and column 0.
    let mut spots = Vec::new();
    for (i, (radio, label)) in demo.radios.iter().enumerate() {
        let width = 4 + label.len() as u16;
        spots.push((2 + i as u16, 1, width, radio.node()));
    }
    let tab_row = 3 + demo.radios.len() as u16;
    let mut column = 1;
    for (tab, label) in &demo.tab_labels {
        let width = label.len() as u16 + 2;
        spots.push((tab_row, column, column + width - 1, tab.node()));
        column += width + 1;
    }
    spots.push((tab_row + 2, 1, RESET_LABEL.len() as u16, demo.reset.node()));
    spots
}

fn style_for(doc: &Document, node: NodeId) -> Style {
    let mut style = Style::default();
    if doc.has_attribute(node, DISABLED) {
        style = style.fg(Color::DarkGray);
    }
    if doc.focused() == Some(node) {
        style = style.add_modifier(Modifier::REVERSED);
    }
    if doc.has_attribute(node, ACTIVE) {
        style = style.add_modifier(Modifier::BOLD);
    }
    style
}

fn view(frame: &mut Frame, doc: &Document, demo: &Demo) {
    let mut lines = vec![Line::styled("Pizza", Style::default().fg(Color::Cyan))];
    for (radio, label) in &demo.radios {
        let mark = if radio.is_checked(doc) { "(•)" } else { "( )" };
        lines.push(Line::from(Span::styled(
            format!("{mark} {label}"),
            style_for(doc, radio.node()),
        )));
    }
    lines.push(Line::styled("Size", Style::default().fg(Color::Cyan)));

    let mut tab_spans = Vec::new();
    for (tab, label) in &demo.tab_labels {
        let mut style = style_for(doc, tab.node());
        if tab.is_selected(doc) {
            style = style.fg(Color::Yellow).add_modifier(Modifier::UNDERLINED);
        }
        tab_spans.push(Span::styled(format!(" {label} "), style));
        tab_spans.push(Span::raw(" "));
    }
    lines.push(Line::from(tab_spans));
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled(
        RESET_LABEL,
        style_for(doc, demo.reset.node()),
    )));
    lines.push(Line::raw(""));

    let chosen = demo
        .group
        .checked_radio(doc)
        .and_then(|node| demo.radios.iter().find(|(r, _)| r.node() == node))
        .map_or("nothing yet", |(_, label)| *label);
    let size = demo
        .tabs
        .selected_tab(doc)
        .and_then(|node| demo.tab_labels.iter().find(|(t, _)| t.node() == node))
        .map_or("?", |(_, label)| *label);
    lines.push(Line::raw(format!("Order: {size} {chosen}")));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" oxy widgets (Ctrl+C quits) ");
    frame.render_widget(Paragraph::new(lines).block(block), frame.area());
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    oxy::logging::log_to_file("widgets.log")?;

    let mut doc = Document::new();
    let demo = build(&mut doc)?;
    let spots = hotspots(&demo);
    let mut driver = Driver::new(doc).with_hit_test(move |_, column, row| {
        spots
            .iter()
            .find(|(r, start, end, _)| *r == row && (*start..=*end).contains(&column))
            .map(|(_, _, _, node)| *node)
    });

    let mut terminal = ratatui::init();
    execute!(stdout(), EnableMouseCapture)?;

    let mut events = EventStream::new();
    let result: Result<(), Box<dyn std::error::Error>> = async {
        loop {
            terminal.draw(|frame| view(frame, driver.document(), &demo))?;
            let Some(event) = events.next().await else {
                break;
            };
            driver.handle(event?);
            if driver.should_quit() {
                break;
            }
        }
        Ok(())
    }
    .await;

    execute!(stdout(), DisableMouseCapture)?;
    ratatui::restore();
    result
}
