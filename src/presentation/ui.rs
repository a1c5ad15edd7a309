use crate::application::{App, AppMode, Toast};
use crate::domain::{Clock, QuotaStatus, Severity};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

pub const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

const INPUT_PLACEHOLDER: &str =
    "Tempelkan teks kamu di sini (draft skripsi, hasil ChatGPT, dll)";
const OUTPUT_PLACEHOLDER: &str = "Hasil perbaikan bahasa akademik akan muncul di sini.";

/// Screen regions, derived from the full terminal area.
struct ScreenLayout {
    header: Rect,
    input: Rect,
    counter: Rect,
    output: Rect,
    action: Rect,
    footer: Rect,
    cta: Rect,
}

fn screen_layout(area: Rect) -> ScreenLayout {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(8),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(4),
        ])
        .split(area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[1]);

    let input_column = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(2)])
        .split(columns[0]);

    ScreenLayout {
        header: rows[0],
        input: input_column[0],
        counter: input_column[1],
        output: columns[1],
        action: rows[2],
        footer: rows[3],
        cta: rows[4],
    }
}

pub fn render_ui<K: Clock>(f: &mut Frame, app: &App<K>) {
    let layout = screen_layout(f.area());

    render_header(f, layout.header);
    render_input(f, app, layout.input);
    render_word_counter(f, app, layout.counter);
    render_output(f, app, layout.output);
    render_action(f, app, layout.action);
    render_footer(f, app, layout.footer);
    render_premium_cta(f, layout.cta);
    render_toasts(f, app.toasts.iter().collect());

    if app.mode == AppMode::Help {
        render_help_popup(f, app.help_scroll);
    }
}

/// Rows the output can scroll by when the terminal is `area` large.
pub fn output_scroll_limit<K: Clock>(app: &App<K>, area: Rect) -> usize {
    wrapped_overflow(app.controller.output(), screen_layout(area).output)
}

/// Wrapped rows of `text` that do not fit inside the bordered `area`.
fn wrapped_overflow(text: &str, area: Rect) -> usize {
    if text.is_empty() {
        return 0;
    }
    let inner_width = area.width.saturating_sub(2);
    let visible = area.height.saturating_sub(2) as usize;
    Paragraph::new(text.to_string())
        .wrap(Wrap { trim: false })
        .line_count(inner_width)
        .saturating_sub(visible)
}

fn render_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new(vec![
        Line::from(Span::styled(
            "🎓 kating.AI",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Ubah teks mentah menjadi bahasa skripsi yang formal dan natural.",
            Style::default().fg(Color::DarkGray),
        )),
    ]);
    f.render_widget(header, area);
}

fn render_input<K: Clock>(f: &mut Frame, app: &App<K>, area: Rect) {
    let locked = app.input_locked();
    let border_style = if locked {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::Cyan)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title("Teks Asli");

    let input = app.controller.input();
    let lines = if input.is_empty() && !locked {
        vec![Line::from(vec![
            Span::styled(" ", Style::default().add_modifier(Modifier::REVERSED)),
            Span::styled(INPUT_PLACEHOLDER, Style::default().fg(Color::DarkGray)),
        ])]
    } else {
        input_lines(input, app.cursor_position, !locked)
    };

    let visible = area.height.saturating_sub(2) as usize;
    let row = cursor_row(input, app.cursor_position, area.width.saturating_sub(2));
    let scroll = row.saturating_sub(visible.saturating_sub(1));
    let text_style = if locked {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default()
    };

    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(text_style)
        .wrap(Wrap { trim: false })
        .scroll((scroll as u16, 0));
    f.render_widget(paragraph, area);
}

/// Splits the input into lines, marking the cursor with a reversed cell.
fn input_lines(input: &str, cursor: usize, show_cursor: bool) -> Vec<Line<'static>> {
    let cursor_style = Style::default().add_modifier(Modifier::REVERSED);
    let mut lines = Vec::new();
    let mut offset = 0;

    for raw in input.split('\n') {
        let len = raw.chars().count();
        if show_cursor && cursor >= offset && cursor <= offset + len {
            let at = cursor - offset;
            let before: String = raw.chars().take(at).collect();
            let under: String = raw.chars().nth(at).map(String::from).unwrap_or_else(|| " ".to_string());
            let after: String = raw.chars().skip(at + 1).collect();
            lines.push(Line::from(vec![
                Span::raw(before),
                Span::styled(under, cursor_style),
                Span::raw(after),
            ]));
        } else {
            lines.push(Line::from(raw.to_string()));
        }
        offset += len + 1;
    }

    lines
}

/// Wrapped row holding the cursor when the input is wrapped at `width`.
///
/// Only the text up to the end of the cursor's word decides where that word
/// lands, so the prefix is wrapped on its own and its rows are counted.
fn cursor_row(input: &str, cursor: usize, width: u16) -> usize {
    let chars: Vec<char> = input.chars().collect();
    let cursor = cursor.min(chars.len());
    let end = chars[cursor..]
        .iter()
        .position(|c| c.is_whitespace())
        .map_or(chars.len(), |offset| cursor + offset);

    let mut prefix: String = chars[..end].iter().collect();
    if end == cursor {
        // the cursor cell itself, past the end of a line or on a separator
        prefix.push(' ');
    }
    Paragraph::new(prefix)
        .wrap(Wrap { trim: false })
        .line_count(width)
        .saturating_sub(1)
}

fn render_word_counter<K: Clock>(f: &mut Frame, app: &App<K>, area: Rect) {
    let count = app.controller.word_count();
    let limit = app.controller.word_limit();
    let status = app.controller.quota_status();

    let count_style = match status {
        QuotaStatus::Within => Style::default().fg(Color::Gray),
        QuotaStatus::NearLimit => Style::default().fg(Color::Yellow),
        QuotaStatus::OverLimit => Style::default().fg(Color::Red),
    }
    .add_modifier(Modifier::BOLD);

    let mut first = vec![Span::styled(format!("{count} / {limit} kata"), count_style)];
    if status.is_over() {
        first.push(Span::styled(
            " · Melebihi batas versi gratis",
            Style::default().fg(Color::Red),
        ));
    }

    let counter = Paragraph::new(vec![
        Line::from(first),
        Line::from(Span::styled(
            "Batas gratis per request",
            Style::default().fg(Color::DarkGray),
        )),
    ]);
    f.render_widget(counter, area);
}

fn render_output<K: Clock>(f: &mut Frame, app: &App<K>, area: Rect) {
    let output = app.controller.output();
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green))
        .title("Versi Bahasa Akademik");

    if !output.is_empty() {
        let hint = if app.controller.is_copied() {
            Span::styled(" ✓ Tersalin ", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
        } else {
            Span::styled(" Ctrl+Y: salin ", Style::default().fg(Color::Yellow))
        };
        block = block.title(Line::from(hint).right_aligned());
    }

    let paragraph = if output.is_empty() {
        Paragraph::new(Span::styled(OUTPUT_PLACEHOLDER, Style::default().fg(Color::DarkGray)))
    } else {
        Paragraph::new(output.to_string())
    };
    let scroll = app.output_scroll.min(wrapped_overflow(output, area));
    f.render_widget(
        paragraph
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((scroll as u16, 0)),
        area,
    );
}

fn render_action<K: Clock>(f: &mut Frame, app: &App<K>, area: Rect) {
    let (label, style) = if app.controller.is_processing() {
        let frame = SPINNER_FRAMES[app.spinner_frame % SPINNER_FRAMES.len()];
        (
            format!("{frame} Kating lagi bantuin ngerapihin…"),
            Style::default().fg(Color::DarkGray),
        )
    } else {
        (
            "Rapikan Jadi Bahasa Skripsi → (Ctrl+S)".to_string(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )
    };

    let button = Paragraph::new(Span::styled(label, style))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(button, area);
}

fn render_footer<K: Clock>(f: &mut Frame, app: &App<K>, area: Rect) {
    let footer = Paragraph::new(format!(
        "Mode Gratis · Maksimal {} kata · Tanpa login | F1: bantuan | Ctrl+Q: keluar",
        app.controller.word_limit()
    ))
    .alignment(Alignment::Center)
    .style(Style::default().fg(Color::DarkGray));
    f.render_widget(footer, area);
}

fn render_premium_cta(f: &mut Frame, area: Rect) {
    let cta = Paragraph::new(vec![
        Line::from(Span::styled(
            "Mode Dosen Killer cocok untuk teks panjang dan revisi akhir sebelum bimbingan.",
            Style::default().fg(Color::Gray),
        )),
        Line::from(Span::styled(
            "[ ✦ Upgrade / Donasi ]",
            Style::default().fg(Color::Magenta),
        )),
    ])
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Magenta))
            .title("✦ Butuh hasil lebih formal?"),
    );
    f.render_widget(cta, area);
}

fn render_toasts(f: &mut Frame, toasts: Vec<&Toast>) {
    let area = f.area();
    let width = area.width.min(48);
    let height = 4;
    let mut y = area.y + 1;

    for toast in toasts.into_iter().rev() {
        if y + height > area.bottom() {
            break;
        }
        let rect = Rect {
            x: area.right().saturating_sub(width + 1),
            y,
            width,
            height,
        };
        let color = match toast.notification.severity {
            Severity::Info => Color::Green,
            Severity::Error => Color::Red,
        };
        let widget = Paragraph::new(toast.notification.description.clone())
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(color))
                    .title(Span::styled(
                        toast.notification.title.clone(),
                        Style::default().fg(color).add_modifier(Modifier::BOLD),
                    )),
            );
        f.render_widget(Clear, rect);
        f.render_widget(widget, rect);
        y += height;
    }
}

fn render_help_popup(f: &mut Frame, scroll: usize) {
    let area = f.area();
    let popup_area = Rect {
        x: area.width / 10,
        y: area.height / 10,
        width: area.width * 4 / 5,
        height: area.height * 4 / 5,
    };

    f.render_widget(Clear, popup_area);

    let help_lines: Vec<&str> = HELP_TEXT.lines().collect();
    let visible_height = popup_area.height.saturating_sub(2) as usize;

    let start_line = scroll.min(help_lines.len().saturating_sub(visible_height));
    let end_line = (start_line + visible_height).min(help_lines.len());

    let visible_text = help_lines[start_line..end_line].join("\n");

    let help_widget = Paragraph::new(visible_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(
                    "Bantuan kating.AI (Baris {}/{})",
                    start_line + 1,
                    help_lines.len()
                ))
                .style(Style::default().fg(Color::Cyan)),
        )
        .style(Style::default().fg(Color::White));

    f.render_widget(help_widget, popup_area);
}

pub const HELP_TEXT: &str = r#"KATING.AI - BANTUAN

=== CARA PAKAI ===
1. Tempelkan atau ketik teks di panel "Teks Asli"
2. Tekan Ctrl+S untuk merapikan teks ke bahasa akademik
3. Hasil muncul di panel "Versi Bahasa Akademik"
4. Tekan Ctrl+Y untuk menyalin hasil ke clipboard

=== BATAS VERSI GRATIS ===
• Maksimal 150 kata per request
• Penghitung kata berubah kuning mendekati batas (80%)
• Penghitung kata berubah merah jika melebihi batas
• Teks kosong atau melebihi batas tidak dikirim

=== PENGETIKAN ===
Huruf / Enter   Ketik teks (nonaktif selama diproses)
Tempel          Tempel teks dari terminal
Backspace/Del   Hapus karakter
← → Home End    Pindahkan kursor
Ctrl+U          Kosongkan teks asli
PgUp/PgDn       Gulir hasil

=== AKSI ===
Ctrl+S          Rapikan Jadi Bahasa Skripsi
Ctrl+Y          Salin hasil ke clipboard
Esc             Tutup notifikasi
F1              Tampilkan bantuan ini
Ctrl+Q/Ctrl+C   Keluar

=== NAVIGASI BANTUAN ===
↑↓ atau j/k     Gulir satu baris
PgUp/PgDn       Gulir lima baris
Home            Kembali ke atas
Esc/F1/q        Tutup bantuan"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::controller::tests::StubService;
    use crate::domain::WORD_LIMIT;
    use ratatui::{Terminal, backend::TestBackend};

    fn render(app: &App) -> Vec<String> {
        render_sized(app, 120, 40)
    }

    fn render_sized(app: &App, width: u16, height: u16) -> Vec<String> {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| render_ui(f, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        let width = buffer.area.width as usize;
        buffer
            .content()
            .chunks(width)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect())
            .collect()
    }

    fn contains(rows: &[String], needle: &str) -> bool {
        rows.iter().any(|row| row.contains(needle))
    }

    #[test]
    fn test_initial_screen() {
        let rows = render(&App::default());
        assert!(contains(&rows, "Teks Asli"));
        assert!(contains(&rows, "Versi Bahasa Akademik"));
        assert!(contains(&rows, "0 / 150 kata"));
        assert!(contains(&rows, "Rapikan Jadi Bahasa Skripsi"));
        assert!(!contains(&rows, "Ctrl+Y: salin"));
    }

    #[test]
    fn test_over_limit_hint() {
        let mut app = App::default();
        app.insert_str(&vec!["kata"; WORD_LIMIT + 1].join(" "));
        let rows = render(&app);
        assert!(contains(&rows, "151 / 150 kata"));
        assert!(contains(&rows, "Melebihi batas versi gratis"));
    }

    #[test]
    fn test_processing_label() {
        let mut app = App::default();
        app.insert_str("teks");
        let _job = app.start_submission().unwrap();
        let rows = render(&app);
        assert!(contains(&rows, "Kating lagi bantuin ngerapihin"));
    }

    #[test]
    fn test_output_and_toast_rendered() {
        let mut app = App::default();
        app.insert_str("teks");
        let job = app.start_submission().unwrap();
        app.finish_submission(job.run(&StubService::ok("Hasil akademik")));

        let rows = render(&app);
        assert!(contains(&rows, "Berhasil"));

        // toasts sit over the top-right corner of the output pane
        app.toasts.dismiss_all();
        let rows = render(&app);
        assert!(contains(&rows, "Hasil akademik"));
        assert!(contains(&rows, "Ctrl+Y: salin"));
    }

    #[test]
    fn test_input_lines_cursor_position() {
        let lines = input_lines("satu\ndua", 6, true);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].spans[0].content, "d");
        assert_eq!(lines[1].spans[1].content, "u");

        let lines = input_lines("satu", 4, true);
        assert_eq!(lines[0].spans[1].content, " ");
    }

    #[test]
    fn test_cursor_row_counts_wrapped_rows() {
        assert_eq!(cursor_row("", 0, 20), 0);
        assert_eq!(cursor_row("satu\ndua", 6, 20), 1);
        assert_eq!(cursor_row("aaa bbb", 0, 5), 0);
        assert_eq!(cursor_row("aaa bbb", 7, 5), 1);
        assert_eq!(cursor_row(&vec!["kata"; 40].join(" "), 0, 20), 0);
        assert!(cursor_row(&vec!["kata"; 40].join(" "), 199, 20) >= 9);
    }

    #[test]
    fn test_long_single_line_input_follows_cursor() {
        let mut app = App::default();
        app.insert_str(&format!("{} AKHIRTEKS", vec!["kata"; 140].join(" ")));

        let rows = render_sized(&app, 80, 24);
        assert!(contains(&rows, "141 / 150 kata"));
        assert!(contains(&rows, "AKHIRTEKS"));

        app.move_cursor_home();
        let rows = render_sized(&app, 80, 24);
        assert!(!contains(&rows, "AKHIRTEKS"));
    }

    #[test]
    fn test_long_output_scrolls_with_page_keys() {
        let mut app = App::default();
        app.insert_str("teks");
        let job = app.start_submission().unwrap();
        let long = format!("{} UJUNGHASIL", vec!["kata"; 200].join(" "));
        app.finish_submission(job.run(&StubService::ok(&long)));
        app.toasts.dismiss_all();

        let area = Rect::new(0, 0, 80, 24);
        let rows = render_sized(&app, 80, 24);
        assert!(contains(&rows, "kata kata"));
        assert!(!contains(&rows, "UJUNGHASIL"));

        let limit = output_scroll_limit(&app, area);
        assert!(limit > 0);
        app.set_output_scroll_limit(limit);
        for _ in 0..limit {
            app.scroll_output_down(5);
        }
        assert_eq!(app.output_scroll, limit);

        let rows = render_sized(&app, 80, 24);
        assert!(contains(&rows, "UJUNGHASIL"));
    }

    #[test]
    fn test_help_popup() {
        let mut app = App::default();
        app.open_help();
        let rows = render(&app);
        assert!(contains(&rows, "Bantuan kating.AI"));
        assert!(contains(&rows, "CARA PAKAI"));
    }
}
