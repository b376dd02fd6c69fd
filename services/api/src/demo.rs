use crate::infra::{CollectionBackedSink, InMemoryResponseStore};
use chrono::Utc;
use clap::Args;
use moral_weights::error::AppError;
use moral_weights::survey::collection::{CollectionError, CollectionService, SubmitterMeta};
use moral_weights::survey::{
    generate_insights, ChoiceSide, EntityCatalog, Session, SurveyService,
    DEFAULT_SESSION_SUBMIT_INTERVAL, INSIGHT_MIN_RESPONSES,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct SimulateArgs {
    /// Number of dilemmas to answer
    #[arg(long, default_value_t = 25)]
    pub(crate) questions: u32,
    /// Seed for reproducible runs (entropy-based when omitted)
    #[arg(long)]
    pub(crate) seed: Option<u64>,
    /// Print the JSON session export after the report
    #[arg(long)]
    pub(crate) export: bool,
}

/// Play a whole survey session against the in-memory collector, answering at
/// random, then print what the rating engine made of it.
pub(crate) fn run_simulation(args: SimulateArgs) -> Result<(), AppError> {
    let SimulateArgs {
        questions,
        seed,
        export,
    } = args;

    let catalog = Arc::new(EntityCatalog::standard());
    let store = Arc::new(InMemoryResponseStore::default());
    let collection = Arc::new(CollectionService::new(store, "local-simulation"));
    let sink = Arc::new(CollectionBackedSink::new(
        collection.clone(),
        SubmitterMeta {
            ip: "local".to_string(),
            user_agent: simulation_user_agent(),
        },
    ));
    let service = SurveyService::new(
        catalog.clone(),
        sink,
        simulation_user_agent(),
        DEFAULT_SESSION_SUBMIT_INTERVAL,
    );

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut session = service.new_session();
    session.started = true;

    for _ in 0..questions {
        let dilemma = service.next_dilemma(&session, &mut rng);
        let choice = if rng.gen_bool(0.5) {
            ChoiceSide::A
        } else {
            ChoiceSide::B
        };
        service.record_choice(&mut session, dilemma, choice);
    }
    service.finish(&session);

    render_session_report(&catalog, &session);

    let stats = collection.stats().map_err(CollectionError::from)?;
    println!("\nCollector received {} submission record(s)", stats.total_records);

    if export {
        let payload = serde_json::to_string_pretty(&session.export(Utc::now()))
            .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidData, err))?;
        println!("\nSession export\n{payload}");
    }

    Ok(())
}

fn simulation_user_agent() -> String {
    format!("moral-weights-cli/{}", env!("CARGO_PKG_VERSION"))
}

fn render_session_report(catalog: &EntityCatalog, session: &Session) {
    println!("Moral weights simulation");
    println!(
        "Session {} started {}",
        session.session_id, session.session_start
    );

    let stats = session
        .elo_ratings
        .coverage(catalog, session.responses.len());
    println!(
        "Answered {} question(s) across {} entities and {} category tags",
        stats.answered, stats.compared_entities, stats.categories
    );

    println!("\nRevealed weights");
    for row in session.elo_ratings.ranked(catalog) {
        println!(
            "- {}: {:+.1} ({} comparisons, {}W/{}L)",
            row.label, row.rating, row.comparisons, row.wins, row.losses
        );
    }

    println!("\nCategory weights");
    for row in session.elo_ratings.category_weights(catalog) {
        println!(
            "- {}: {:+.1} across {} entities",
            row.category, row.average, row.entities
        );
    }

    let untested = session.elo_ratings.untested(catalog);
    if untested.is_empty() {
        println!("\nUntested entities: none");
    } else {
        println!("\nUntested entities: {}", untested.join(", "));
    }

    if session.responses.len() >= INSIGHT_MIN_RESPONSES {
        println!("\nInsights");
        for insight in generate_insights(&session.elo_ratings, catalog, session.responses.len()) {
            println!("- {}", insight.detail);
        }
    }

    println!("\nRecent choices");
    for response in session.recent_responses() {
        let chosen = response.scenario.option(response.choice);
        let rejected = match response.choice {
            ChoiceSide::A => &response.scenario.option_b,
            ChoiceSide::B => &response.scenario.option_a,
        };
        println!(
            "- [{}] chose \"{}\" over \"{}\"",
            response.choice.label(),
            chosen.text,
            rejected.text
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simulation_runs_end_to_end_with_a_fixed_seed() {
        let args = SimulateArgs {
            questions: 12,
            seed: Some(4242),
            export: false,
        };
        run_simulation(args).expect("simulation completes");
    }
}
