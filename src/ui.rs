use anyhow::Result;
use child_growth::advisor::{AdviceTone, Evaluation};
use child_growth::chart::{hex_to_rgb, WeightChart};
use child_growth::pages::{AboutSection, CalculatorResult};
use child_growth::{
    format_certificate, compare_snapshot, render_page, AppConfig, ArtifactPaths, BmiCategory, BmiResult,
    Measurement, NutritionAdvice, Page, PageView, SessionSnapshot, Sex,
};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph, Wrap},
    Frame, Terminal,
};
use std::io;

// ============================================================================
// CALCULATOR FORM
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Age,
    Sex,
    Weight,
    Height,
}

impl FormField {
    pub const ALL: [FormField; 5] = [
        FormField::Name,
        FormField::Age,
        FormField::Sex,
        FormField::Weight,
        FormField::Height,
    ];

    pub fn next(&self) -> Self {
        match self {
            FormField::Name => FormField::Age,
            FormField::Age => FormField::Sex,
            FormField::Sex => FormField::Weight,
            FormField::Weight => FormField::Height,
            FormField::Height => FormField::Name,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            FormField::Name => FormField::Height,
            FormField::Age => FormField::Name,
            FormField::Sex => FormField::Age,
            FormField::Weight => FormField::Sex,
            FormField::Height => FormField::Weight,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            FormField::Name => "Nama Anak",
            FormField::Age => "Usia Anak (tahun)",
            FormField::Sex => "Jenis Kelamin",
            FormField::Weight => "Berat Badan (kg)",
            FormField::Height => "Tinggi Badan (cm)",
        }
    }
}

/// Raw text as typed; parsed and range-checked only on submit
#[derive(Debug, Clone)]
pub struct CalculatorForm {
    pub name: String,
    pub age: String,
    pub sex: Sex,
    pub weight: String,
    pub height: String,
    pub focused: FormField,
}

impl CalculatorForm {
    pub fn new() -> Self {
        let defaults = Measurement::default();
        Self {
            name: defaults.name,
            age: defaults.age_years.to_string(),
            sex: defaults.sex,
            weight: format!("{:.1}", defaults.weight_kg),
            height: format!("{:.1}", defaults.height_cm),
            focused: FormField::Name,
        }
    }

    fn focused_text_mut(&mut self) -> Option<&mut String> {
        match self.focused {
            FormField::Name => Some(&mut self.name),
            FormField::Age => Some(&mut self.age),
            FormField::Weight => Some(&mut self.weight),
            FormField::Height => Some(&mut self.height),
            FormField::Sex => None,
        }
    }

    pub fn value(&self, field: FormField) -> String {
        match field {
            FormField::Name => self.name.clone(),
            FormField::Age => self.age.clone(),
            FormField::Sex => self.sex.label().to_string(),
            FormField::Weight => self.weight.clone(),
            FormField::Height => self.height.clone(),
        }
    }

    pub fn input_char(&mut self, c: char) {
        let accepts = match self.focused {
            FormField::Name => !c.is_control(),
            FormField::Age => c.is_ascii_digit(),
            FormField::Weight | FormField::Height => c.is_ascii_digit() || c == '.',
            FormField::Sex => false,
        };

        if accepts {
            if let Some(text) = self.focused_text_mut() {
                text.push(c);
            }
        }
    }

    pub fn backspace(&mut self) {
        if let Some(text) = self.focused_text_mut() {
            text.pop();
        }
    }

    pub fn toggle_sex(&mut self) {
        self.sex = self.sex.toggle();
    }

    pub fn to_measurement(&self) -> Result<Measurement> {
        let age = self
            .age
            .trim()
            .parse::<u32>()
            .map_err(|_| anyhow::anyhow!("Usia tidak valid: '{}'", self.age))?;
        let weight = self
            .weight
            .trim()
            .parse::<f64>()
            .map_err(|_| anyhow::anyhow!("Berat badan tidak valid: '{}'", self.weight))?;
        let height = self
            .height
            .trim()
            .parse::<f64>()
            .map_err(|_| anyhow::anyhow!("Tinggi badan tidak valid: '{}'", self.height))?;

        let measurement = Measurement::new(self.name.trim(), age, self.sex, weight, height);
        measurement.check_input_domains()?;
        Ok(measurement)
    }
}

impl Default for CalculatorForm {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// APP STATE
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    Info(String),
    Error(String),
}

pub struct App {
    pub current_page: Page,
    pub form: CalculatorForm,
    pub snapshot: Option<SessionSnapshot>,
    pub notice: Option<Notice>,
    pub config: AppConfig,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        Self {
            current_page: Page::Calculator,
            form: CalculatorForm::new(),
            snapshot: None,
            notice: None,
            config,
        }
    }

    pub fn next_page(&mut self) {
        self.current_page = self.current_page.next();
    }

    pub fn previous_page(&mut self) {
        self.current_page = self.current_page.previous();
    }

    /// "Cek Ideal": replace the snapshot, then write the certificate.
    /// A rejected form leaves the previous snapshot in place.
    pub fn submit(&mut self) {
        let measurement = match self.form.to_measurement() {
            Ok(m) => m,
            Err(e) => {
                self.notice = Some(Notice::Error(e.to_string()));
                return;
            }
        };

        let snapshot = SessionSnapshot::capture(measurement);
        let (weight_status, height_status) = compare_snapshot(&snapshot);
        let paths = ArtifactPaths::new(&self.config.certificate_path, &self.config.qr_image_path);

        let written = format_certificate(
            &snapshot.measurement,
            snapshot.ideal_weight,
            weight_status,
            height_status,
            &paths,
        );
        self.snapshot = Some(snapshot);

        self.notice = Some(match written {
            Ok(paths) => Notice::Info(format!("Sertifikat disimpan: {}", paths.pdf.display())),
            Err(e) => Notice::Error(format!("Gagal menyimpan sertifikat: {:#}", e)),
        });
    }

    /// Returns true when the app should quit
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return true;
        }

        match key.code {
            KeyCode::Esc => return true,
            KeyCode::Tab => {
                if key.modifiers.contains(KeyModifiers::SHIFT) {
                    self.previous_page();
                } else {
                    self.next_page();
                }
            }
            KeyCode::BackTab => self.previous_page(),
            KeyCode::F(n @ 1..=5) => self.current_page = Page::ALL[(n - 1) as usize],
            _ if self.current_page == Page::Calculator => self.handle_form_key(key),
            KeyCode::Char('q') => return true,
            KeyCode::Char(c @ '1'..='5') => {
                self.current_page = Page::ALL[(c as u8 - b'1') as usize];
            }
            _ => {}
        }

        false
    }

    fn handle_form_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => self.submit(),
            KeyCode::Down => self.form.focused = self.form.focused.next(),
            KeyCode::Up => self.form.focused = self.form.focused.previous(),
            KeyCode::Left | KeyCode::Right | KeyCode::Char(' ') if self.form.focused == FormField::Sex => {
                self.form.toggle_sex()
            }
            KeyCode::Backspace => self.form.backspace(),
            KeyCode::Char(c) => self.form.input_char(c),
            _ => {}
        }
    }
}

// ============================================================================
// TERMINAL LOOP
// ============================================================================

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if app.handle_key(key) {
                return Ok(());
            }
        }
    }
}

// ============================================================================
// RENDERING
// ============================================================================

fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with navigation
            Constraint::Min(0),    // Content area
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    match render_page(app.current_page, app.snapshot.as_ref()) {
        PageView::Calculator { result } => render_calculator(f, chunks[1], app, result.as_ref()),
        PageView::Chart { chart } => render_chart(f, chunks[1], &chart),
        PageView::Bmi { bmi, index_text } => render_bmi(f, chunks[1], &bmi, &index_text),
        PageView::NutritionAdvice { advice } => render_advice(f, chunks[1], &advice),
        PageView::About { sections } => render_about(f, chunks[1], sections),
        PageView::AwaitingSubmission { requested, message } => {
            render_awaiting(f, chunks[1], requested, message)
        }
    }

    render_status_bar(f, chunks[2], app);
}

fn page_block(page: Page) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White))
        .title(format!(" {} ", page.heading()))
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let mut tab_spans = vec![];
    for (i, page) in Page::ALL.iter().enumerate() {
        if i > 0 {
            tab_spans.push(Span::raw(" │ "));
        }

        let style = if *page == app.current_page {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        tab_spans.push(Span::styled(format!("F{} {}", i + 1, page.title()), style));
    }

    if let Some(snapshot) = &app.snapshot {
        tab_spans.push(Span::raw("  |  "));
        tab_spans.push(Span::styled(
            format!("Data: {}", snapshot.measurement.name),
            Style::default().fg(Color::Green),
        ));
    }

    let header = Paragraph::new(vec![Line::from(tab_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Navigasi "),
    );

    f.render_widget(header, area);
}

fn render_calculator(f: &mut Frame, area: Rect, app: &App, result: Option<&CalculatorResult>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(10), Constraint::Min(0)])
        .split(area);

    let label_style = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let mut lines = vec![Line::from(Span::styled(
        "  Masukkan data anak Anda, dan dapatkan hasil berat & tinggi ideal lengkap dengan rekomendasi!",
        Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
    ))];
    lines.push(Line::from(""));

    for field in FormField::ALL {
        let focused = field == app.form.focused;
        let marker = if focused {
            Span::styled("→ ", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
        } else {
            Span::raw("  ")
        };
        let value = match field {
            FormField::Sex => format!("◀ {} ▶", app.form.value(field)),
            _ if focused => format!("{}_", app.form.value(field)),
            _ => app.form.value(field),
        };
        let value_style = if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::White)
        };

        lines.push(Line::from(vec![
            marker,
            Span::styled(format!("{:<20}: ", field.label()), label_style),
            Span::styled(value, value_style),
        ]));
    }

    let form = Paragraph::new(lines).block(page_block(Page::Calculator));
    f.render_widget(form, chunks[0]);

    let result_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White))
        .title(" Kesimpulan ");

    let content = match result {
        Some(result) => calculator_result_lines(&result.evaluation, &result.current_height),
        None => vec![
            Line::from(""),
            Line::from(Span::styled(
                "  Tekan Enter untuk Cek Ideal",
                Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
            )),
        ],
    };

    let paragraph = Paragraph::new(content)
        .block(result_block)
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, chunks[1]);
}

fn calculator_result_lines(evaluation: &Evaluation, current_height: &str) -> Vec<Line<'static>> {
    let delta_color = if evaluation.weight_delta > 0.0 {
        Color::Red
    } else {
        Color::Green
    };
    let label_style = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);

    vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("  Berat Ideal: ", label_style),
            Span::styled(evaluation.ideal_weight_text(), Style::default().fg(Color::White)),
            Span::raw("  "),
            Span::styled(evaluation.weight_delta_text(), Style::default().fg(delta_color)),
        ]),
        Line::from(vec![
            Span::styled("  Tinggi Sekarang: ", label_style),
            Span::styled(current_height.to_string(), Style::default().fg(Color::White)),
        ]),
        Line::from(""),
        Line::from(format!("  {}", evaluation.conclusion)),
    ]
}

fn render_chart(f: &mut Frame, area: Rect, chart: &WeightChart) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let heading = Paragraph::new(vec![Line::from(Span::styled(
        format!("  {}", chart.y_label),
        Style::default().fg(Color::DarkGray),
    ))])
    .block(page_block(Page::Chart));
    f.render_widget(heading, chunks[0]);

    let bars: Vec<Bar> = chart
        .bars
        .iter()
        .map(|bar| {
            let (r, g, b) = hex_to_rgb(bar.color).unwrap_or((255, 255, 255));
            Bar::default()
                .label(Line::from(bar.label))
                .value((bar.value.max(0.0) * 100.0).round() as u64)
                .text_value(format!("{:.2}", bar.value))
                .style(Style::default().fg(Color::Rgb(r, g, b)))
        })
        .collect();

    let widget = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White))
                .title(format!(" {} ", chart.title)),
        )
        .data(BarGroup::default().bars(&bars))
        .bar_width(12)
        .bar_gap(6)
        .value_style(Style::default().fg(Color::Black).add_modifier(Modifier::BOLD));

    f.render_widget(widget, chunks[1]);
}

fn bmi_color(category: BmiCategory) -> Color {
    match category {
        BmiCategory::Normal => Color::Green,
        BmiCategory::Skinny | BmiCategory::Excess => Color::Yellow,
        BmiCategory::VerySkinny | BmiCategory::Obese => Color::Red,
        BmiCategory::Invalid => Color::DarkGray,
    }
}

fn render_bmi(f: &mut Frame, area: Rect, bmi: &BmiResult, index_text: &str) {
    let label_style = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let content = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("  IMT: ", label_style),
            Span::styled(index_text.to_string(), Style::default().fg(Color::White).add_modifier(Modifier::BOLD)),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Kategori: ", label_style),
            Span::styled(bmi.category.label(), Style::default().fg(bmi_color(bmi.category))),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "  <14 Sangat Kurus │ 14-17 Kurus │ 17-20 Normal │ 20-25 Berlebih │ ≥25 Obesitas",
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )),
    ];

    f.render_widget(Paragraph::new(content).block(page_block(Page::Bmi)), area);
}

fn render_advice(f: &mut Frame, area: Rect, advice: &NutritionAdvice) {
    let color = match advice.tone {
        AdviceTone::Success => Color::Green,
        AdviceTone::Warning => Color::Yellow,
        AdviceTone::Error => Color::Red,
    };

    let content = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("  Status Berat: ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            Span::styled(advice.status.label(), Style::default().fg(color)),
        ]),
        Line::from(""),
        Line::from(Span::styled(format!("  {}", advice.message), Style::default().fg(color))),
    ];

    let paragraph = Paragraph::new(content)
        .block(page_block(Page::NutritionAdvice))
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}

fn render_about(f: &mut Frame, area: Rect, sections: &[AboutSection]) {
    let mut content = vec![];
    for section in sections {
        content.push(Line::from(""));
        content.push(Line::from(Span::styled(
            format!("  {}", section.heading),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        )));
        for paragraph in section.paragraphs {
            content.push(Line::from(format!("  {}", paragraph)));
        }
    }

    let paragraph = Paragraph::new(content)
        .block(page_block(Page::About))
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}

fn render_awaiting(f: &mut Frame, area: Rect, page: Page, message: &str) {
    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(format!("  ⚠ {}", message), Style::default().fg(Color::Yellow))),
    ])
    .alignment(Alignment::Left)
    .block(page_block(page));

    f.render_widget(content, area);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let mut status_spans = vec![];

    match &app.notice {
        Some(Notice::Info(msg)) => {
            status_spans.push(Span::styled(format!(" ✓ {} ", msg), Style::default().fg(Color::Green)));
            status_spans.push(Span::raw(" | "));
        }
        Some(Notice::Error(msg)) => {
            status_spans.push(Span::styled(format!(" ✗ {} ", msg), Style::default().fg(Color::Red)));
            status_spans.push(Span::raw(" | "));
        }
        None => {}
    }

    if app.current_page == Page::Calculator {
        status_spans.push(Span::styled("↑/↓", Style::default().fg(Color::Yellow)));
        status_spans.push(Span::raw(" Field | "));
        status_spans.push(Span::styled("←/→", Style::default().fg(Color::Yellow)));
        status_spans.push(Span::raw(" Sex | "));
        status_spans.push(Span::styled("Enter", Style::default().fg(Color::Yellow)));
        status_spans.push(Span::raw(" Cek Ideal | "));
    }
    status_spans.push(Span::styled("Tab", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Page | "));
    status_spans.push(Span::styled("Esc", Style::default().fg(Color::Red)));
    status_spans.push(Span::raw(" Quit"));

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

// ============================================================================
// TESTS
// ============================================================================
