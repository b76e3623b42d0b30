//! TUI 日期范围选择器演示
//!
//! 使用 crossterm 和 ratatui 构建的终端宿主，底层由 `range-picker-core` 驱动。
//! 终端充当 UI 适配层：两个输入框 + 弹出的月历网格，所有状态都来自 `HeadlessAdapter`。
//!
//! # 用法
//!
//! ```bash
//! cargo run -p tui-range-picker -- [from] [to] [--masked] [--no-weekends]
//! ```
//!
//! `from` / `to` 使用 ISO 格式 (`2024-01-10`)。
//!
//! # 日志（可选）
//!
//! ```bash
//! RUST_LOG=debug cargo run -p tui-range-picker --features logging
//! ```
//!
//! 日志写入当前目录下的 `tui-range-picker.log`，不会干扰终端界面。
//!
//! # 快捷键
//!
//! - 数字 / `/`: 输入日期
//! - Backspace: 删除字符
//! - Tab: 切换输入框
//! - Down: 打开日历
//! - 方向键 / PageUp / PageDown: 日历内移动（打开时）
//! - Enter: 选择日期（打开时）
//! - Esc / Alt+Up: 关闭日历
//! - F2: 切换日历
//! - Ctrl+T / Ctrl+L: 今天 / 清空
//! - F3: 切换输入掩码
//! - F4: 切换禁用状态
//! - Ctrl+C / Ctrl+Q: 退出

use chrono::{Datelike, Days, Months, NaiveDate, Weekday};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use range_picker_core::{
    CalendarSelection, Clock, DateRange, EventDetail, FocusTarget, HeadlessAdapter, HostEvent,
    InputEvent, InputField, KeyPress, MASK_PLACEHOLDER, PatternFormatter, PickerCommand,
    PickerKey, PickerOptions, RangeCoordinator, RangeEdge, SystemClock, format::parse_iso_date,
    mask::mask_format,
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use std::{
    collections::VecDeque,
    env,
    io::{self, stdout},
    process,
};

/// 状态栏保留的事件条数
const EVENT_HISTORY: usize = 4;

struct App {
    /// 日期范围协调器
    picker: RangeCoordinator<HeadlessAdapter>,
    /// 当前焦点输入框
    focus: InputField,
    /// 日历光标（打开时有效）
    cursor: Option<NaiveDate>,
    /// 已处理的日历按键数（适配器记录的 propagated_keys）
    seen_keys: usize,
    /// 已同步的 active date（today 快捷方式会推送）
    seen_active: Option<NaiveDate>,
    /// 最近的宿主事件
    history: VecDeque<String>,
    /// 是否需要退出
    should_quit: bool,
    /// 今天
    today: NaiveDate,
}

impl App {
    fn new(options: PickerOptions) -> Result<Self, String> {
        let mut picker = RangeCoordinator::new(HeadlessAdapter::new(), options)
            .map_err(|e| e.to_string())?;
        picker.initialize();

        let mut app = Self {
            picker,
            focus: InputField::From,
            cursor: None,
            seen_keys: 0,
            seen_active: None,
            history: VecDeque::with_capacity(EVENT_HISTORY),
            should_quit: false,
            today: SystemClock.today(),
        };

        app.picker.adapter_mut().set_focus(Some(InputField::From));
        app.dispatch(InputEvent::Focus {
            field: InputField::From,
        });
        Ok(app)
    }

    fn dispatch(&mut self, event: InputEvent) {
        self.picker.handle_event(event);
        self.sync();
    }

    fn execute(&mut self, command: PickerCommand) {
        self.picker.execute(command);
        self.sync();
    }

    /// 从适配器拉取日历状态与宿主事件
    fn sync(&mut self) {
        self.sync_calendar();
        self.sync_events();
    }

    fn sync_calendar(&mut self) {
        let calendar = self.picker.adapter().calendar();
        if !calendar.attached {
            self.cursor = None;
            self.seen_keys = 0;
            self.seen_active = None;
            return;
        }

        if self.cursor.is_none() {
            self.cursor = Some(calendar.month_of.unwrap_or(self.today));
        }
        if calendar.active_date.is_some() && calendar.active_date != self.seen_active {
            self.seen_active = calendar.active_date;
            self.cursor = calendar.active_date;
        }

        // attach 会清空记录，长度变短时重新计数
        if calendar.propagated_keys.len() < self.seen_keys {
            self.seen_keys = 0;
        }
        let pending: Vec<KeyPress> = calendar.propagated_keys[self.seen_keys..].to_vec();
        self.seen_keys = calendar.propagated_keys.len();

        for key in pending {
            self.calendar_key(key);
        }
    }

    /// 把新事件移入历史，然后清空适配器记录，避免长时间运行时无限增长
    fn sync_events(&mut self) {
        let lines: Vec<String> = self
            .picker
            .adapter()
            .event_log()
            .iter()
            .map(|dispatched| describe_event(&dispatched.event, dispatched.not_canceled))
            .collect();
        self.picker.adapter_mut().clear_calls();

        for line in lines {
            if self.history.len() == EVENT_HISTORY {
                self.history.pop_front();
            }
            self.history.push_back(line);
        }
    }

    /// 日历网格处理被转发的按键
    fn calendar_key(&mut self, key: KeyPress) {
        let Some(cursor) = self.cursor else {
            return;
        };

        let moved = match key.key {
            PickerKey::Enter => {
                self.select(cursor);
                return;
            }
            PickerKey::ArrowLeft => cursor.checked_sub_days(Days::new(1)),
            PickerKey::ArrowRight => cursor.checked_add_days(Days::new(1)),
            PickerKey::ArrowUp => cursor.checked_sub_days(Days::new(7)),
            PickerKey::ArrowDown => cursor.checked_add_days(Days::new(7)),
            PickerKey::PageUp => cursor.checked_sub_months(Months::new(1)),
            PickerKey::PageDown => cursor.checked_add_months(Months::new(1)),
            _ => None,
        };

        if let Some(date) = moved {
            self.cursor = Some(date);
            self.picker.handle_event(InputEvent::CalendarActiveCell {
                id: format!("cell-{date}"),
            });
        }
    }

    /// 按日历的选择规则生成候选范围：先选起点，再选终点
    fn select(&mut self, date: NaiveDate) {
        let current = self.picker.value();
        let selection = match (current.from, current.to) {
            (Some(from), None) if from <= date => {
                CalendarSelection::new(date, DateRange::between(from, date), RangeEdge::To)
            }
            _ => CalendarSelection::new(date, DateRange::starting(date), RangeEdge::From),
        };
        self.picker.handle_event(InputEvent::CalendarSelect(selection));
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c') | KeyCode::Char('q')) => {
                self.should_quit = true;
            }
            (KeyModifiers::CONTROL, KeyCode::Char('t')) => self.dispatch(InputEvent::TodayClick),
            (KeyModifiers::CONTROL, KeyCode::Char('l')) => self.dispatch(InputEvent::ClearClick),
            (_, KeyCode::F(2)) => self.dispatch(InputEvent::ToggleClick),
            (_, KeyCode::F(3)) => {
                let masked = !self.picker.is_masked();
                self.execute(PickerCommand::SetMasked(masked));
            }
            (_, KeyCode::F(4)) => {
                let disabled = !self.picker.is_disabled();
                self.execute(PickerCommand::SetDisabled(disabled));
            }
            (_, KeyCode::Tab | KeyCode::BackTab) => {
                self.send_key(PickerKey::Tab, false);
                self.move_focus(self.focus.other());
            }
            (_, KeyCode::Char(c)) if c.is_ascii_digit() || c == '/' => self.type_char(c),
            (_, KeyCode::Backspace) => self.backspace(),
            (modifiers, code) => {
                if let Some(picker_key) = picker_key(code) {
                    self.send_key(picker_key, modifiers.contains(KeyModifiers::ALT));
                }
            }
        }
    }

    fn send_key(&mut self, key: PickerKey, alt: bool) {
        let press = if alt {
            KeyPress::alt(key)
        } else {
            KeyPress::plain(key)
        };
        self.dispatch(InputEvent::Key {
            field: self.focus,
            key: press,
        });
    }

    fn move_focus(&mut self, target: InputField) {
        let previous = self.focus;
        self.picker.adapter_mut().set_focus(Some(target));
        self.dispatch(InputEvent::Blur {
            field: previous,
            related: Some(FocusTarget::Input(target)),
        });
        self.focus = target;
        self.dispatch(InputEvent::Focus { field: target });
    }

    fn type_char(&mut self, c: char) {
        if self.picker.is_disabled() {
            return;
        }
        let field = self.focus;
        let current = self.picker.adapter().input_text(field).to_string();

        if self.picker.is_masked() {
            if c == '/' {
                return;
            }
            let mut digits: String = current.chars().filter(char::is_ascii_digit).collect();
            digits.push(c);
            self.resolve_mask(field, &digits);
        } else {
            let text = format!("{current}{c}");
            self.picker.adapter_mut().type_text(field, text.clone());
            self.dispatch(InputEvent::Input { field, text });
        }
    }

    fn backspace(&mut self) {
        if self.picker.is_disabled() {
            return;
        }
        let field = self.focus;
        let current = self.picker.adapter().input_text(field).to_string();

        if self.picker.is_masked() {
            let mut digits: String = current.chars().filter(char::is_ascii_digit).collect();
            digits.pop();
            self.resolve_mask(field, &digits);
        } else {
            let mut text = current;
            text.pop();
            self.picker.adapter_mut().type_text(field, text.clone());
            self.dispatch(InputEvent::Input { field, text });
        }
    }

    /// 模拟掩码组件：把数字依次填入占位符，然后上报解析结果
    fn resolve_mask(&mut self, field: InputField, digits: &str) {
        let template = mask_format(PatternFormatter::DEFAULT_PATTERN);
        let mut digits = digits.chars();
        let mut filled = 0;
        let text: String = template
            .chars()
            .map(|slot| {
                if slot != MASK_PLACEHOLDER {
                    return slot;
                }
                match digits.next() {
                    Some(digit) => {
                        filled += 1;
                        digit
                    }
                    None => MASK_PLACEHOLDER,
                }
            })
            .collect();

        let text = if filled == 0 { String::new() } else { text };
        self.picker.adapter_mut().type_text(field, text.clone());
        self.dispatch(InputEvent::MaskResolved { field, text });
    }

    fn render(&self, frame: &mut Frame) {
        let size = frame.area();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),                        // 输入框
                Constraint::Min(10),                          // 日历
                Constraint::Length(EVENT_HISTORY as u16 + 2), // 事件
                Constraint::Length(1),                        // 状态行
                Constraint::Length(1),                        // 快捷键提示
            ])
            .split(size);

        self.render_inputs(frame, chunks[0]);
        self.render_calendar(frame, chunks[1]);
        self.render_events(frame, chunks[2]);
        self.render_status_line(frame, chunks[3]);
        self.render_shortcuts(frame, chunks[4]);
    }

    fn render_inputs(&self, frame: &mut Frame, area: Rect) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);

        for (field, column) in [InputField::From, InputField::To].into_iter().zip(columns.iter()) {
            let input = self.picker.adapter().input(field);
            let title = match field {
                InputField::From => " From ",
                InputField::To => " To ",
            };
            let border = if input.disabled {
                Style::default().fg(Color::DarkGray)
            } else if field == self.focus {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default()
            };
            let text = if input.text.is_empty() && input.mask.is_some() && field == self.focus {
                Span::styled(
                    mask_format(PatternFormatter::DEFAULT_PATTERN),
                    Style::default().fg(Color::DarkGray),
                )
            } else {
                Span::raw(input.text.clone())
            };

            let paragraph = Paragraph::new(Line::from(text)).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(border)
                    .title(title),
            );
            frame.render_widget(paragraph, *column);
        }
    }

    fn render_calendar(&self, frame: &mut Frame, area: Rect) {
        let calendar = self.picker.adapter().calendar();
        let block = Block::default().borders(Borders::ALL).title(" Calendar ");
        let (Some(cursor), Some(config)) = (self.cursor, calendar.config.as_ref()) else {
            let hint = Paragraph::new("Down / F2 打开日历").block(block);
            frame.render_widget(hint, area);
            return;
        };

        let mut lines = vec![
            Line::from(Span::styled(
                cursor.format("%B %Y").to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from("Mo Tu We Th Fr Sa Su"),
        ];

        for week in month_grid(cursor) {
            let mut spans = Vec::with_capacity(14);
            for cell in week {
                let Some(date) = cell else {
                    spans.push(Span::raw("   "));
                    continue;
                };

                let mut style = Style::default();
                if !config.policy.is_date_acceptable(Some(date)) {
                    style = style.fg(Color::DarkGray).add_modifier(Modifier::CROSSED_OUT);
                }
                if calendar.value.contains(date)
                    || calendar.value.from == Some(date)
                    || calendar.value.to == Some(date)
                {
                    style = style.bg(Color::Blue).fg(Color::White);
                }
                if date == self.today {
                    style = style.add_modifier(Modifier::UNDERLINED);
                }
                if date == cursor {
                    style = style.add_modifier(Modifier::REVERSED);
                }
                spans.push(Span::styled(format!("{:>2}", date.day()), style));
                spans.push(Span::raw(" "));
            }
            lines.push(Line::from(spans));
        }

        let mut footer = Vec::new();
        if config.show_today {
            footer.push("[Ctrl+T] Today");
        }
        if config.show_clear {
            footer.push("[Ctrl+L] Clear");
        }
        if !footer.is_empty() {
            lines.push(Line::from(footer.join("  ")));
        }

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn render_events(&self, frame: &mut Frame, area: Rect) {
        let lines: Vec<Line> = self.history.iter().map(|line| Line::from(line.as_str())).collect();
        let events =
            Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Events "));
        frame.render_widget(events, area);
    }

    fn render_status_line(&self, frame: &mut Frame, area: Rect) {
        let value = self.picker.value();
        let status_text = format!(
            "范围: {} .. {} | 日历:{} | 掩码:{} | 禁用:{}",
            format_date(value.from),
            format_date(value.to),
            on_off(self.picker.is_open()),
            on_off(self.picker.is_masked()),
            on_off(self.picker.is_disabled()),
        );

        let status_line = Paragraph::new(status_text).style(
            Style::default()
                .bg(Color::DarkGray)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        );

        frame.render_widget(status_line, area);
    }

    /// 渲染快捷键提示
    fn render_shortcuts(&self, frame: &mut Frame, area: Rect) {
        let shortcuts = "Tab:切换  Down/F2:日历  Enter:选择  Esc:关闭  Ctrl-T/L:今天/清空  F3:掩码  F4:禁用  Ctrl-Q:退出";

        let shortcuts_line =
            Paragraph::new(shortcuts).style(Style::default().bg(Color::Blue).fg(Color::White));

        frame.render_widget(shortcuts_line, area);
    }
}

fn picker_key(code: KeyCode) -> Option<PickerKey> {
    match code {
        KeyCode::Esc => Some(PickerKey::Escape),
        KeyCode::Enter => Some(PickerKey::Enter),
        KeyCode::Up => Some(PickerKey::ArrowUp),
        KeyCode::Down => Some(PickerKey::ArrowDown),
        KeyCode::Left => Some(PickerKey::ArrowLeft),
        KeyCode::Right => Some(PickerKey::ArrowRight),
        KeyCode::PageUp => Some(PickerKey::PageUp),
        KeyCode::PageDown => Some(PickerKey::PageDown),
        KeyCode::Home => Some(PickerKey::Home),
        KeyCode::End => Some(PickerKey::End),
        KeyCode::Char(' ') => Some(PickerKey::Space),
        _ => None,
    }
}

/// 月历网格：每行一周，周一开头
fn month_grid(anchor: NaiveDate) -> Vec<[Option<NaiveDate>; 7]> {
    let mut weeks = Vec::new();
    let Some(first) = anchor.with_day(1) else {
        return weeks;
    };

    let mut week = [None; 7];
    let mut day = first;
    while day.month() == first.month() {
        let column = day.weekday().num_days_from_monday() as usize;
        week[column] = Some(day);
        if day.weekday() == Weekday::Sun {
            weeks.push(week);
            week = [None; 7];
        }
        match day.succ_opt() {
            Some(next) => day = next,
            None => break,
        }
    }
    if week.iter().any(Option::is_some) {
        weeks.push(week);
    }
    weeks
}

fn describe_event(event: &HostEvent, not_canceled: bool) -> String {
    let detail = match &event.detail {
        EventDetail::None => String::new(),
        EventDetail::Range(range) => {
            format!(" {} .. {}", format_date(range.from), format_date(range.to))
        }
        EventDetail::Text { field, text } => format!(" {field:?}={text:?}"),
    };
    let canceled = if not_canceled { "" } else { " (canceled)" };
    format!("{}{}{}", event.kind.name(), detail, canceled)
}

fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string())
}

fn on_off(flag: bool) -> &'static str {
    if flag { "开" } else { "关" }
}

fn parse_args(args: &[String]) -> Result<PickerOptions, String> {
    let mut options = PickerOptions::default()
        .masked(false)
        .with_shortcuts(true, true);
    let mut dates = Vec::new();

    for arg in args {
        match arg.as_str() {
            "--masked" => options = options.masked(true).show_mask_format(true),
            "--no-weekends" => {
                options = options.with_disabled_days_of_week([Weekday::Sat, Weekday::Sun]);
            }
            other => match parse_iso_date(other) {
                Some(date) => dates.push(date),
                None => return Err(format!("无法解析参数: {other}")),
            },
        }
    }

    let value = match dates.as_slice() {
        [] => DateRange::empty(),
        [from] => DateRange::starting(*from),
        [from, to] => DateRange::between(*from, *to),
        _ => return Err("最多两个日期".to_string()),
    };
    Ok(options.with_value(value))
}

#[cfg(feature = "logging")]
fn init_logging() {
    match std::fs::File::create("tui-range-picker.log") {
        Ok(file) => {
            env_logger::Builder::from_default_env()
                .target(env_logger::Target::Pipe(Box::new(file)))
                .init();
        }
        Err(err) => eprintln!("无法创建日志文件: {err}"),
    }
}

#[cfg(not(feature = "logging"))]
fn init_logging() {}

fn main() -> io::Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let options = match parse_args(&args) {
        Ok(options) => options,
        Err(err) => {
            eprintln!("{err}");
            eprintln!("\n用法: tui-range-picker [from] [to] [--masked] [--no-weekends]");
            process::exit(1);
        }
    };

    init_logging();

    let mut app = match App::new(options) {
        Ok(app) => app,
        Err(err) => {
            eprintln!("错误: {err}");
            process::exit(1);
        }
    };

    // 设置终端
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // 主循环
    let result = run_app(&mut terminal, &mut app);

    // 恢复终端
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    app.picker.destroy();

    if let Err(err) = result {
        eprintln!("错误: {}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| app.render(f))?;

        if app.should_quit {
            break;
        }

        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                app.handle_key_event(key);
            }
        }
    }

    Ok(())
}
