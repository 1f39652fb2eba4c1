use async_trait::async_trait;
use tracing::debug;

use crate::traits::Handler;
use crate::Result;

/// Reply given when no listed title appears in the query
pub const NO_TICKETS_REPLY: &str = "❌ No ticket info found.";

/// A title and the times it is showing
#[derive(Debug, Clone, PartialEq, Eq)]
struct Listing {
    title: String,
    needle: String,
    times: Vec<String>,
}

/// Looks up showtimes for the first listed title mentioned in a query
#[derive(Debug, Clone, Default)]
pub struct ShowtimeHandler {
    listings: Vec<Listing>,
}

impl ShowtimeHandler {
    /// An empty showtime table
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a title; titles added earlier are checked first
    pub fn with_listing<I, T>(mut self, title: impl Into<String>, times: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let title = title.into();
        self.listings.push(Listing {
            needle: title.to_lowercase(),
            title,
            times: times.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// The box office's current listings
    pub fn tonight() -> Self {
        Self::new()
            .with_listing("Avatar", ["6 PM", "8 PM", "10 PM"])
            .with_listing("Movie X", ["7 PM", "9 PM"])
    }

    fn lookup(&self, query: &str) -> Option<&Listing> {
        let query = query.to_lowercase();
        self.listings
            .iter()
            .find(|listing| query.contains(listing.needle.as_str()))
    }
}

/// "6 PM", "6 PM and 8 PM", "6 PM, 8 PM, and 10 PM"
fn join_times(times: &[String]) -> String {
    match times {
        [] => String::new(),
        [only] => only.clone(),
        [first, second] => format!("{} and {}", first, second),
        [rest @ .., last] => format!("{}, and {}", rest.join(", "), last),
    }
}

#[async_trait]
impl Handler for ShowtimeHandler {
    async fn handle(&self, query: &str) -> Result<String> {
        match self.lookup(query) {
            Some(listing) if !listing.times.is_empty() => {
                debug!(title = %listing.title, "found showtimes");
                Ok(format!(
                    "🎟️ Tickets for {} available at {}.",
                    listing.title,
                    join_times(&listing.times)
                ))
            }
            _ => Ok(NO_TICKETS_REPLY.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn times(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_join_times() {
        assert_eq!(join_times(&times(&[])), "");
        assert_eq!(join_times(&times(&["6 PM"])), "6 PM");
        assert_eq!(join_times(&times(&["7 PM", "9 PM"])), "7 PM and 9 PM");
        assert_eq!(
            join_times(&times(&["6 PM", "8 PM", "10 PM"])),
            "6 PM, 8 PM, and 10 PM"
        );
    }

    #[tokio::test]
    async fn test_tonight_listings() {
        let handler = ShowtimeHandler::tonight();
        assert_eq!(
            handler.handle("Ticket timings for AVATAR").await.unwrap(),
            "🎟️ Tickets for Avatar available at 6 PM, 8 PM, and 10 PM."
        );
        assert_eq!(
            handler.handle("any tickets for movie x?").await.unwrap(),
            "🎟️ Tickets for Movie X available at 7 PM and 9 PM."
        );
        assert_eq!(
            handler.handle("tickets for Dune").await.unwrap(),
            NO_TICKETS_REPLY
        );
    }

    #[tokio::test]
    async fn test_first_listing_wins() {
        let handler = ShowtimeHandler::new()
            .with_listing("Avatar", ["6 PM"])
            .with_listing("Avatar 2", ["9 PM"]);
        assert_eq!(
            handler.handle("avatar 2 tickets").await.unwrap(),
            "🎟️ Tickets for Avatar available at 6 PM."
        );
    }

    #[tokio::test]
    async fn test_listing_without_times() {
        let handler = ShowtimeHandler::new().with_listing("Dune", Vec::<String>::new());
        assert_eq!(handler.handle("dune").await.unwrap(), NO_TICKETS_REPLY);
    }
}
