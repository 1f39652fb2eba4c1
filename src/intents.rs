//! The movie assistant's intents and its ready-made router.

use std::fmt;
use std::sync::Arc;

use crate::handlers::{PromptHandler, ShowtimeHandler, StaticHandler};
use crate::router::{Router, RouterBuilder, Rule};
use crate::traits::LanguageModel;
use crate::Result;

/// Reply for queries the assistant does not recognise
pub const FALLBACK_REPLY: &str =
    "🤖 I can help with ticket info, box office predictions, or movie facts. Try asking about those!";

/// What a movie-assistant query is about, in routing priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MovieIntent {
    Tickets,
    BoxOffice,
    MovieInfo,
}

impl MovieIntent {
    /// All intents, highest priority first
    pub const ALL: [MovieIntent; 3] = [
        MovieIntent::Tickets,
        MovieIntent::BoxOffice,
        MovieIntent::MovieInfo,
    ];

    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            MovieIntent::Tickets => &["ticket", "showtime", "timing"],
            MovieIntent::BoxOffice => &[
                "box office",
                "predict earnings",
                "how much will",
                "budget",
                "collection",
            ],
            MovieIntent::MovieInfo => &["movie", "about", "who directed", "plot", "cast", "avatar"],
        }
    }

    pub fn rule(self) -> Rule<MovieIntent> {
        Rule::new(self, self.keywords().iter().copied())
    }
}

impl fmt::Display for MovieIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MovieIntent::Tickets => "ticketing",
            MovieIntent::BoxOffice => "box office",
            MovieIntent::MovieInfo => "movie info",
        };
        f.write_str(label)
    }
}

/// The movie assistant: showtimes, box office forecasts, movie facts, and a
/// hint for everything else. Both model-backed intents share `llm`.
pub fn movie_router<L: LanguageModel + 'static>(llm: Arc<L>) -> Result<Router<MovieIntent>> {
    RouterBuilder::new()
        .with_rule(MovieIntent::Tickets.rule(), ShowtimeHandler::tonight())
        .with_rule(
            MovieIntent::BoxOffice.rule(),
            PromptHandler::box_office(llm.clone()),
        )
        .with_rule(MovieIntent::MovieInfo.rule(), PromptHandler::movie_info(llm))
        .with_fallback(StaticHandler::new(FALLBACK_REPLY))
        .build()
}
