use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use interview_quiz::{
    ai::OpenRouterClient,
    ai_worker::{AiRequest, AiResponse, AiWorker},
    app::App,
    config::AppConfig,
    db::{self, draft::DRAFT_KEY},
    error::GenerationError,
    export,
    models::AppState,
    notes::get_note_files,
    quiz::{handle_quiz_input, QuizAction, QuizStage},
    results::{handle_results_input, ResultsAction, ResultsState},
    setup::{handle_setup_input, SetupAction, SetupState},
    ui::{draw_loading, draw_quiz, draw_results, draw_setup},
};
use ratatui::{backend::CrosstermBackend, Frame, Terminal};
use rusqlite::Connection;
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(250);
const AI_DISABLED_MESSAGE: &str = "AI is disabled. Set OPENROUTER_API_KEY and restart.";

/// Per-stage UI state next to the controller.
struct Screens {
    app: App,
    setup: SetupState,
    quiz: Option<QuizStage>,
    results: Option<ResultsState>,
    /// Kept alive so copied text stays available on X11/Wayland.
    clipboard: Option<arboard::Clipboard>,
    tick: usize,
}

fn main() -> io::Result<()> {
    let data_dir = db::get_data_dir();
    if let Err(e) = interview_quiz::logger::init(&data_dir.join("quiz.log")) {
        eprintln!("Could not open log file: {}", e);
    }

    let config = AppConfig::load(&data_dir);
    tracing::info!(model = %config.model, notes_dir = %config.notes_dir.display(), "starting");

    let conn = match db::init_db(&data_dir) {
        Ok(conn) => Some(conn),
        Err(e) => {
            tracing::error!(error = %e, "draft store unavailable");
            None
        }
    };
    let draft = conn
        .as_ref()
        .and_then(|conn| match db::draft::load_draft(conn, DRAFT_KEY) {
            Ok(draft) => draft,
            Err(e) => {
                tracing::error!(error = %e, "failed to load draft");
                None
            }
        })
        .unwrap_or_default();

    let worker = match OpenRouterClient::new(config.model_config()) {
        Ok(client) => match AiWorker::spawn(Arc::new(client), config.generation_options()) {
            Ok(worker) => Some(worker),
            Err(e) => {
                tracing::error!(error = %e, "failed to spawn AI worker");
                None
            }
        },
        Err(e) => {
            tracing::warn!(error = %e, "AI disabled");
            None
        }
    };

    let mut screens = Screens {
        app: App::new(config.confidence_step),
        setup: SetupState::new(
            draft,
            get_note_files(&config.notes_dir),
            config.default_question_count,
        ),
        quiz: None,
        results: None,
        clipboard: None,
        tick: 0,
    };

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut screens, &config, conn.as_ref(), worker.as_ref());

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        tracing::error!(error = %e, "terminal error");
    }
    tracing::info!("exiting");
    result
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    screens: &mut Screens,
    config: &AppConfig,
    conn: Option<&Connection>,
    worker: Option<&AiWorker>,
) -> io::Result<()> {
    loop {
        if let Some(worker) = worker {
            while let Ok(response) = worker.rx.try_recv() {
                apply_response(screens, response);
            }
        }

        if let Some(stage) = screens.quiz.as_mut() {
            stage.tick(Instant::now());
        }

        terminal.draw(|f| draw(f, screens, worker.is_some(), &config.model))?;
        screens.tick = screens.tick.wrapping_add(1);

        if !event::poll(POLL_INTERVAL)? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Ok(());
        }

        if !handle_key(screens, key, config, conn, worker) {
            return Ok(());
        }
    }
}

fn draw(f: &mut Frame, screens: &mut Screens, ai_ready: bool, model: &str) {
    match screens.app.state() {
        AppState::Setup => draw_setup(f, &mut screens.setup, screens.app.error(), ai_ready, model),
        AppState::Loading => draw_loading(
            f,
            screens.setup.difficulty,
            screens.setup.question_count(),
            screens.tick,
        ),
        AppState::Quiz => {
            if let (Some(session), Some(stage)) = (screens.app.session(), screens.quiz.as_ref()) {
                draw_quiz(f, session, stage);
            }
        }
        AppState::Results => {
            if let (Some(session), Some(results)) = (screens.app.session(), screens.results.as_mut())
            {
                draw_results(f, session, results);
            }
        }
    }
}

/// Returns false when the app should exit.
fn handle_key(
    screens: &mut Screens,
    key: KeyEvent,
    config: &AppConfig,
    conn: Option<&Connection>,
    worker: Option<&AiWorker>,
) -> bool {
    match screens.app.state() {
        AppState::Setup => match handle_setup_input(&mut screens.setup, key) {
            SetupAction::None => {}
            SetupAction::DraftChanged => {
                if let Some(conn) = conn
                    && let Err(e) = db::draft::save_draft(conn, DRAFT_KEY, &screens.setup.draft)
                {
                    tracing::error!(error = %e, "failed to save draft");
                }
            }
            SetupAction::Submit(request) => {
                let Some(worker) = worker else {
                    screens.app.report_error(AI_DISABLED_MESSAGE);
                    return true;
                };
                if screens.app.begin_generation() {
                    tracing::info!(
                        difficulty = request.difficulty.label(),
                        count = request.question_count,
                        "submitting quiz request"
                    );
                    if !worker.send(AiRequest::GenerateQuiz(request.clone())) {
                        screens.app.complete_generation(
                            &request,
                            Err(GenerationError::Provider("AI worker stopped".to_string())),
                        );
                    }
                }
            }
            SetupAction::Quit => return false,
        },
        AppState::Loading => {
            if key.code == KeyCode::Esc {
                return false;
            }
        }
        AppState::Quiz => {
            let Some(stage) = screens.quiz.as_mut() else {
                return true;
            };
            match handle_quiz_input(stage, key, Instant::now()) {
                QuizAction::None => {}
                QuizAction::Finished(outcome) => {
                    screens.app.finish(outcome);
                    if screens.app.state() == AppState::Results {
                        screens.quiz = None;
                        enter_results(screens, worker);
                    }
                }
                QuizAction::Abandon => {
                    tracing::info!("quiz abandoned");
                    screens.quiz = None;
                    screens.app.restart();
                }
            }
        }
        AppState::Results => {
            let (Some(session), Some(results)) = (screens.app.session(), screens.results.as_mut())
            else {
                return true;
            };
            match handle_results_input(results, session, key) {
                ResultsAction::Copy(text) => match copy_to_clipboard(&mut screens.clipboard, text) {
                    Ok(()) => results.status_message = Some("Copied".to_string()),
                    Err(e) => tracing::error!(error = %e, "failed to copy to clipboard"),
                },
                ResultsAction::None => {}
                ResultsAction::Ask(request) => {
                    let sent = worker.is_some_and(|w| w.send(request.clone()));
                    if !sent && let AiRequest::Clarify { question, query, .. } = request {
                        results.apply_clarification(
                            question.id,
                            query,
                            Err(GenerationError::Provider(AI_DISABLED_MESSAGE.to_string())),
                        );
                    }
                }
                ResultsAction::Export => {
                    if let Some(summary) = results.ready_summary() {
                        let today = chrono::Local::now().date_naive();
                        match export::export_summary(
                            &config.export_dir,
                            session.difficulty(),
                            summary,
                            today,
                        ) {
                            Ok(path) => {
                                results.status_message = Some(format!("Saved {}", path.display()));
                            }
                            Err(e) => tracing::error!(error = %e, "failed to export cheatsheet"),
                        }
                    }
                }
                ResultsAction::Restart => {
                    screens.results = None;
                    screens.setup.notice = None;
                    screens.app.restart();
                }
                ResultsAction::Quit => return false,
            }
        }
    }
    true
}

fn copy_to_clipboard(
    slot: &mut Option<arboard::Clipboard>,
    text: String,
) -> Result<(), arboard::Error> {
    let mut clipboard = match slot.take() {
        Some(clipboard) => clipboard,
        None => arboard::Clipboard::new()?,
    };
    let result = clipboard.set_text(text);
    *slot = Some(clipboard);
    result
}

fn enter_results(screens: &mut Screens, worker: Option<&AiWorker>) {
    let Some(session) = screens.app.session() else {
        return;
    };
    let mut results = ResultsState::new();
    if let Some(request) = results.summary_request(session) {
        let sent = worker.is_some_and(|w| w.send(request));
        if !sent {
            results.apply_summary(Err(GenerationError::Provider(
                AI_DISABLED_MESSAGE.to_string(),
            )));
        }
    }
    screens.results = Some(results);
}

fn apply_response(screens: &mut Screens, response: AiResponse) {
    match response {
        AiResponse::Quiz { request, result } => {
            if screens.app.state() != AppState::Loading {
                tracing::warn!("dropping quiz for a screen that moved on");
                return;
            }
            screens.app.complete_generation(&request, result);
            if let Some(session) = screens.app.session() {
                screens.quiz = Some(QuizStage::new(
                    session,
                    screens.app.confidence_step(),
                    Instant::now(),
                ));
            }
        }
        AiResponse::Clarification {
            question_id,
            query,
            result,
        } => match screens.results.as_mut() {
            Some(results) => results.apply_clarification(question_id, query, result),
            None => tracing::warn!(%question_id, "dropping clarification outside results"),
        },
        AiResponse::Summary(result) => match screens.results.as_mut() {
            Some(results) => results.apply_summary(result),
            None => tracing::warn!("dropping summary outside results"),
        },
    }
}
