// --- Portal de Horarios - Cliente de línea de comandos ---

use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

use timetable_portal::models::{StatusMessage, SubjectType, YearLevel};
use timetable_portal::pages::{
    ClassTimetablePage, DataInputPage, FacultyPage, LectureAllocationPage, LoginPage,
    PracticalAllocationPage, PreferenceReviewPage, TimetablePage,
};
use timetable_portal::ui::Shell;
use timetable_portal::{ClientError, Config, HttpBackend, Session};

#[derive(Parser, Debug)]
#[command(name = "timetable-portal", version, about = "Timetable and faculty preference portal client")]
struct CliArgs {
    /// Override PORTAL_API_URL
    #[arg(long, global = true)]
    api_url: Option<String>,
    /// Override PORTAL_DATA_DIR (where session.json lives)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in and store the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long, default_value = "faculty")]
        role: String,
    },
    /// Remove the stored session
    Logout,
    /// Subjects configured for a year/semester (HOD)
    Subjects {
        #[arg(long)]
        year: YearLevel,
        #[arg(long)]
        semester: u8,
    },
    /// Division allocation table for a year/semester (HOD)
    Allocation {
        #[arg(long)]
        year: YearLevel,
        #[arg(long)]
        semester: u8,
    },
    /// Pending faculty preferences (HOD)
    Pending,
    /// Timetable of the logged-in faculty member
    Timetable,
    /// Submit subject preferences (faculty). Year blocks take SEMESTER:SUBJ,SUBJ,SUBJ
    Preferences {
        #[arg(long)]
        name: String,
        #[arg(long)]
        short_name: String,
        #[arg(long)]
        designation: String,
        #[arg(long)]
        practical: bool,
        #[arg(long)]
        se: Option<YearChoice>,
        #[arg(long)]
        te: Option<YearChoice>,
        #[arg(long)]
        be: Option<YearChoice>,
    },
    /// Add a subject with its weekly load (HOD)
    AddSubject {
        #[arg(long)]
        year: YearLevel,
        #[arg(long)]
        semester: u8,
        #[arg(long)]
        name: String,
        #[arg(long)]
        lab: bool,
        #[arg(long, default_value = "")]
        load: String,
    },
    /// Save a teacher/division allocation for one subject (HOD)
    SaveAllocation {
        #[arg(long)]
        year: YearLevel,
        #[arg(long)]
        semester: u8,
        #[arg(long)]
        subject_id: i64,
        #[arg(long)]
        teacher_id: String,
        #[arg(long)]
        division_id: Option<String>,
    },
    /// Approve a pending preference with the chosen subject (HOD)
    Approve {
        #[arg(long)]
        preference_id: i64,
        #[arg(long)]
        subject: String,
    },
    /// Delete a pending preference (HOD)
    DeletePreference {
        #[arg(long)]
        preference_id: i64,
    },
    /// Allocate a theory lecture (HOD)
    AllotLecture {
        #[arg(long)]
        class_id: String,
        #[arg(long)]
        subject_id: String,
        #[arg(long)]
        teacher_id: String,
    },
    /// Allot a practical batch to a faculty member (HOD)
    AllotPractical {
        #[arg(long)]
        year: YearLevel,
        #[arg(long)]
        semester: u8,
        #[arg(long)]
        subject_id: String,
        #[arg(long)]
        faculty_id: String,
        #[arg(long)]
        class_id: String,
        #[arg(long)]
        batch_id: String,
    },
    /// Generated timetable of a class (HOD)
    ClassTimetable {
        #[arg(long)]
        class_id: String,
    },
}

/// Bloque de preferencias de un año en la línea de comandos: `3:DSA,OOP`.
#[derive(Debug, Clone)]
struct YearChoice {
    semester: u8,
    prefs: Vec<String>,
}

impl FromStr for YearChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (semester, prefs) = s.split_once(':').unwrap_or((s, ""));
        let semester = semester
            .trim()
            .parse()
            .map_err(|_| format!("'{semester}' is not a semester"))?;
        let prefs: Vec<String> = prefs
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect();
        if prefs.len() > 3 {
            return Err("at most three preferences per year".to_string());
        }
        Ok(Self { semester, prefs })
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let args = CliArgs::parse();
    let shell = Arc::new(Shell::new());
    let result = run(args, shell.clone()).await;

    for notice in shell.drain_notices() {
        eprintln!("{}", notice.text());
    }
    if let Some(location) = shell.location() {
        info!("navigated to {location}");
    }

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: CliArgs, shell: Arc<Shell>) -> Result<(), ClientError> {
    let mut config = Config::load()?;
    if let Some(url) = args.api_url {
        config.api_url = url;
    }
    if let Some(dir) = args.data_dir {
        config.data_dir = dir;
    }

    let backend = Arc::new(HttpBackend::from_config(&config)?);
    let session = Session::in_dir(&config.data_dir);

    match args.command {
        Command::Login { email, password, role } => {
            let page = LoginPage::new(backend, session, shell);
            page.set_email(email);
            page.set_password(password);
            page.set_role(role);
            match page.login().await {
                Ok(redirect) => println!("{redirect}"),
                Err(e) => {
                    if let Some(text) = page.error() {
                        eprintln!("{text}");
                    }
                    return Err(e);
                }
            }
        }
        Command::Logout => session.clear()?,
        Command::Subjects { year, semester } => {
            let page = DataInputPage::init(backend, &session, shell)?;
            page.set_load_year(Some(year));
            page.set_load_semester(Some(semester)).await?;
            println!("{}", page.render_subject_listing().into_string());
        }
        Command::Allocation { year, semester } => {
            let page = DataInputPage::init(backend, &session, shell)?;
            page.show_division_allocation();
            page.set_alloc_year(Some(year));
            page.set_alloc_semester(Some(semester))?;
            page.build_allocation_table().await?;
            println!("{}", page.allocation().render().into_string());
        }
        Command::Pending => {
            let page = PreferenceReviewPage::init(backend, &session, shell)?;
            page.load().await?;
            println!("{}", page.render().into_string());
        }
        Command::Timetable => {
            let page = TimetablePage::init(backend, &session, shell)?;
            page.load().await?;
            println!("{}", page.render().into_string());
        }
        Command::Preferences { name, short_name, designation, practical, se, te, be } => {
            let page = FacultyPage::init(backend, &session, shell)?;
            page.set_faculty_name(name);
            page.set_short_name(short_name);
            page.set_designation(designation);
            page.set_willing_for_practical(practical);
            for (year, choice) in [(YearLevel::SE, se), (YearLevel::TE, te), (YearLevel::BE, be)] {
                let Some(choice) = choice else { continue };
                page.select_semester(year, Some(choice.semester)).await?;
                for (slot, subject) in choice.prefs.iter().enumerate() {
                    page.select_preference(year, slot, subject)?;
                }
            }
            let result = page.submit().await;
            print_message(page.message());
            result?;
        }
        Command::AddSubject { year, semester, name, lab, load } => {
            let page = DataInputPage::init(backend, &session, shell)?;
            page.set_load_year(Some(year));
            page.set_load_semester(Some(semester)).await?;
            page.set_subject_name(name);
            if lab {
                page.set_subject_type(SubjectType::Lab);
                page.set_practical_load(load);
            } else {
                page.set_lecture_load(load);
            }
            page.add_subject().await?;
            println!("{}", page.render_subject_listing().into_string());
        }
        Command::SaveAllocation { year, semester, subject_id, teacher_id, division_id } => {
            let page = DataInputPage::init(backend, &session, shell)?;
            page.set_alloc_year(Some(year));
            page.set_alloc_semester(Some(semester))?;
            page.build_allocation_table().await?;
            page.select_row_teacher(subject_id, &teacher_id)?;
            if let Some(division) = division_id {
                page.select_row_division(subject_id, &division)?;
            }
            page.save_allocation(subject_id).await?;
        }
        Command::Approve { preference_id, subject } => {
            let page = PreferenceReviewPage::init(backend, &session, shell)?;
            page.load().await?;
            page.choose(preference_id, &subject)?;
            let result = page.approve().await;
            print_message(page.message());
            result?;
        }
        Command::DeletePreference { preference_id } => {
            let page = PreferenceReviewPage::init(backend, &session, shell)?;
            page.delete(preference_id).await?;
            println!("{}", page.render().into_string());
        }
        Command::AllotLecture { class_id, subject_id, teacher_id } => {
            let page = LectureAllocationPage::init(backend, &session, shell).await?;
            page.select_class(&class_id).await?;
            page.select_subject(&subject_id).await?;
            page.select_teacher(&teacher_id)?;
            let result = page.submit().await;
            print_message(page.message());
            result?;
        }
        Command::AllotPractical { year, semester, subject_id, faculty_id, class_id, batch_id } => {
            let page = PracticalAllocationPage::init(backend, &session, shell).await?;
            page.select_year(Some(year)).await;
            page.select_semester(Some(semester)).await?;
            page.select_class(&class_id).await?;
            page.select_subject(&subject_id)?;
            page.select_faculty(&faculty_id)?;
            page.select_batch(&batch_id)?;
            let result = page.submit().await;
            print_message(page.message());
            result?;
        }
        Command::ClassTimetable { class_id } => {
            let page = ClassTimetablePage::init(backend, &session, shell).await?;
            page.select_class(&class_id).await?;
            println!("{}", page.render().into_string());
        }
    }
    Ok(())
}

fn print_message(message: Option<StatusMessage>) {
    if let Some(m) = message {
        println!("{}", m.text);
    }
}
