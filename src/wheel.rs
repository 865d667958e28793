// The Wheel of Food itself: picks a category, tells the story of the spin,
// runs the search and picks a restaurant.

use crate::api::{Business, SearchBackend, SearchQuery, SearchResponse};
use crate::config::Config;
use crate::error::{Result, WheelError};
use crate::ui::{Narrative, Printer};
use rand::seq::SliceRandom;
use rand::Rng;
use std::io::Write;

/// Categories that end the spin without a search.
pub const SENTINELS: [&str; 2] = ["GO HUNGRY", "SPIN AGAIN"];

/// Whether `category` is one of [`SENTINELS`], ignoring case and
/// surrounding whitespace.
pub fn is_sentinel(category: &str) -> bool {
    SENTINELS
        .iter()
        .any(|s| category.trim().eq_ignore_ascii_case(s))
}

/// How a spin ended.
#[derive(Debug, Clone, PartialEq)]
pub enum SpinOutcome {
    /// Landed on a sentinel; nothing was searched.
    Sentinel { category: String },
    /// The search came back empty.
    NoResults { category: String },
    Chosen { category: String, business: Business },
}

impl SpinOutcome {
    pub fn category(&self) -> &str {
        match self {
            SpinOutcome::Sentinel { category }
            | SpinOutcome::NoResults { category }
            | SpinOutcome::Chosen { category, .. } => category,
        }
    }

    pub fn business(&self) -> Option<&Business> {
        match self {
            SpinOutcome::Chosen { business, .. } => Some(business),
            _ => None,
        }
    }
}

/// The wheel: configured word lists, a search backend and a random source.
pub struct Wheel<'a, B, R> {
    config: &'a Config,
    backend: B,
    rng: R,
}

impl<'a, B: SearchBackend, R: Rng> Wheel<'a, B, R> {
    pub fn new(config: &'a Config, backend: B, rng: R) -> Self {
        Wheel {
            config,
            backend,
            rng,
        }
    }

    /// Uniformly pick one of the configured categories. Sentinels are
    /// ordinary entries here.
    pub fn select_category(&mut self) -> Result<String> {
        self.config
            .categories
            .choose(&mut self.rng)
            .cloned()
            .ok_or(WheelError::EmptyList { list: "categories" })
    }

    /// A random adjective and, half the time, two tossed foods. The two
    /// food draws are independent and can repeat.
    pub fn narrative(&mut self) -> Narrative {
        let adjective = self.config.adjectives.choose(&mut self.rng).cloned();
        let foods = &self.config.foods;
        let tossed = if !foods.is_empty() && self.rng.gen_bool(0.5) {
            let first = foods[self.rng.gen_range(0..foods.len())].clone();
            let second = foods[self.rng.gen_range(0..foods.len())].clone();
            Some((first, second))
        } else {
            None
        };
        Narrative { adjective, tossed }
    }

    /// Spin the wheel for `location`. With no `category` one is picked at
    /// random. Narrative, the landed category and the sentinel or
    /// no-results notices are written to `printer`; a chosen business is
    /// returned for the caller to render.
    pub fn spin<W: Write>(
        &mut self,
        printer: &mut Printer<W>,
        location: &str,
        category: Option<&str>,
        radius_meters: u32,
    ) -> Result<SpinOutcome> {
        let category = match category {
            Some(c) => c.to_string(),
            None => self.select_category()?,
        };

        let narrative = self.narrative();
        printer.narrative(&narrative)?;
        printer.landed(&category)?;

        if is_sentinel(&category) {
            tracing::debug!(%category, "landed on a sentinel, skipping search");
            printer.sentinel(&category)?;
            return Ok(SpinOutcome::Sentinel { category });
        }

        let query = SearchQuery::new(location, category.as_str()).with_radius(radius_meters);
        let spinner = printer.spinner("Spinning the wheel...");
        let response = self.backend.search(&query);
        spinner.finish_and_clear();

        match response? {
            SearchResponse::Error(fields) => {
                tracing::warn!(?fields, "search API returned an error payload");
                Err(WheelError::UpstreamApi { fields })
            }
            SearchResponse::Results(businesses) => {
                tracing::debug!(count = businesses.len(), "search returned businesses");
                match businesses.choose(&mut self.rng) {
                    Some(business) => Ok(SpinOutcome::Chosen {
                        business: business.clone(),
                        category,
                    }),
                    None => {
                        printer.no_results(&category, location)?;
                        Ok(SpinOutcome::NoResults { category })
                    }
                }
            }
        }
    }
}
