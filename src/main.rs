use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use course_mapper::catalog::CatalogClient;
use course_mapper::models::Course;
use course_mapper::planner::RoadmapStore;
use course_mapper::{api, db, report};

#[derive(Parser)]
#[command(name = "cmap")]
#[command(about = "Plan a multi-year academic roadmap")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the Course Mapper server
    Serve {
        /// Port for HTTP API
        #[arg(short, long, default_value = "3000")]
        port: u16,
    },
    /// Print the roadmap summary as JSON
    Show,
    /// Print the roadmap as plain text
    Export,
    /// Look up courses in the catalog and enroll them
    Import {
        /// Course identifiers, e.g. `cs111` or `CAS CS 111`
        #[arg(required = true)]
        courses: Vec<String>,

        /// Credit value to record for each imported course
        #[arg(short, long, default_value = "4")]
        credits: u32,
    },
    /// Re-fetch hub requirements for every enrolled course
    RefreshHubs,
    /// Discard the saved roadmap and start from the default plan
    Reset,
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG")
            .unwrap_or_else(|_| "course_mapper=debug,tower_http=debug".into()),
    );

    // Logs go to stderr so `show` and `export` output can be piped
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn open_db() -> anyhow::Result<db::Database> {
    let db = db::Database::open_default()?;
    db.migrate()?;
    Ok(db)
}

async fn serve(port: u16) -> anyhow::Result<()> {
    tracing::info!("Starting Course Mapper server on port {}", port);

    let app = api::create_router(open_db()?)?;

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await?;
    tracing::info!("Course Mapper server listening on http://127.0.0.1:{}", port);

    axum::serve(listener, app).await?;
    Ok(())
}

async fn import(courses: Vec<String>, credits: u32) -> anyhow::Result<()> {
    let db = open_db()?;
    let client = CatalogClient::from_env();

    if !client.is_available().await {
        anyhow::bail!("Course catalog is not reachable; nothing was imported");
    }

    let mut failed = 0;
    for identifier in &courses {
        match client.fetch_course(identifier, credits).await {
            Ok(course) => {
                let course = db.add_enrolled_course(course)?;
                println!("Enrolled {} ({} cr)", course.course_id, course.credits);
            }
            Err(e) => {
                failed += 1;
                tracing::warn!("Could not import {}: {}", identifier, e);
                eprintln!("Skipped {}: {}", identifier, e);
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{} of {} courses could not be imported", failed, courses.len());
    }
    Ok(())
}

async fn refresh_hubs() -> anyhow::Result<()> {
    let db = open_db()?;
    let courses = db.list_enrolled_courses()?;
    if courses.is_empty() {
        println!("No enrolled courses");
        return Ok(());
    }

    let client = CatalogClient::from_env();
    let codes: Vec<String> = courses.iter().map(|c| c.course_id.clone()).collect();
    let response = client.course_hubs(&codes).await?;

    let mut updated = 0;
    for result in response.results {
        let Some(course) = courses.iter().find(|c| c.course_id == result.course) else {
            continue;
        };
        if course.hub_requirements != result.hub_requirements {
            db.add_enrolled_course(Course {
                hub_requirements: result.hub_requirements,
                ..course.clone()
            })?;
            updated += 1;
        }
    }

    tracing::info!(updated, "Refreshed hub requirements");
    println!(
        "Updated {} of {} courses ({} distinct hubs)",
        updated,
        courses.len(),
        response.total_unique_hubs
    );
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    match cli.command {
        Some(Commands::Serve { port }) => serve(port).await?,
        Some(Commands::Show) => {
            let store = RoadmapStore::load(open_db()?);
            println!(
                "{}",
                serde_json::to_string_pretty(&report::summarize(store.roadmap()))?
            );
        }
        Some(Commands::Export) => {
            let store = RoadmapStore::load(open_db()?);
            print!("{}", report::render_text(store.roadmap()));
        }
        Some(Commands::Import { courses, credits }) => import(courses, credits).await?,
        Some(Commands::RefreshHubs) => refresh_hubs().await?,
        Some(Commands::Reset) => {
            let mut store = RoadmapStore::load(open_db()?);
            store.reset()?;
            println!("Roadmap reset to {} semesters", store.roadmap().semesters.len());
        }
        None => serve(3000).await?,
    }

    Ok(())
}
