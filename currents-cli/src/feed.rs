//! Compose and inspect command implementations for the Currents CLI.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Write};

use camino::{Utf8Path, Utf8PathBuf};
use chrono::Utc;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use currents_core::{
    GUEST_KEY, InMemoryProfileStore, InMemoryTagCatalog, Market, MarketTags, PersonalizedFeed,
    ProfileStore, TrendingRanks, UserProfile,
};
use currents_feed::{ComposeRequest, DEFAULT_TOTAL, FeedComposer, GuestRequest};

use crate::{
    ARG_FEED_DATA_DIR, ARG_FEED_KEY, ARG_FEED_MARKETS, ARG_FEED_PROFILES, ARG_FEED_TAGS,
    CliError, ENV_FEED_KEY,
};

/// CLI arguments shared by the `compose` and `inspect` subcommands.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Compose a feed from local JSON fixtures (markets.json, \
                 tags.json, profiles.json). Paths can come from CLI flags, \
                 configuration files, or environment variables. The key \
                 selects a profile from the profiles fixture; the literal \
                 key \"guest\" takes the profile-free path.",
    about = "Compose a feed for a user key or \"guest\""
)]
#[ortho_config(prefix = "CURRENTS")]
pub(crate) struct FeedArgs {
    /// Feed key: a user id from the profiles fixture, or "guest".
    #[arg(value_name = "key")]
    #[serde(default)]
    pub(crate) key: Option<String>,
    /// Directory containing the default fixture filenames.
    #[arg(long = ARG_FEED_DATA_DIR, value_name = "dir")]
    #[serde(default)]
    pub(crate) data_dir: Option<Utf8PathBuf>,
    /// Override the path to the market collection (`markets.json`).
    #[arg(long = ARG_FEED_MARKETS, value_name = "path")]
    #[serde(default)]
    pub(crate) markets: Option<Utf8PathBuf>,
    /// Override the path to the tag catalog (`tags.json`).
    #[arg(long = ARG_FEED_TAGS, value_name = "path")]
    #[serde(default)]
    pub(crate) tags: Option<Utf8PathBuf>,
    /// Override the path to the profile store (`profiles.json`).
    #[arg(long = ARG_FEED_PROFILES, value_name = "path")]
    #[serde(default)]
    pub(crate) profiles: Option<Utf8PathBuf>,
    /// Requested feed size, hero excluded.
    #[arg(long, value_name = "count")]
    #[serde(default)]
    pub(crate) total: Option<usize>,
    /// Seed for the randomness stream; drawn from entropy when omitted.
    #[arg(long, value_name = "seed")]
    #[serde(default)]
    pub(crate) seed: Option<u64>,
}

impl FeedArgs {
    fn into_config(self) -> Result<FeedConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        FeedConfig::try_from(merged)
    }
}

/// Resolved feed command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FeedConfig {
    /// Key to compose for.
    pub(crate) key: String,
    /// Path to the market collection fixture.
    pub(crate) markets_path: Utf8PathBuf,
    /// Path to the tag catalog fixture.
    pub(crate) tags_path: Utf8PathBuf,
    /// Path to the profile store fixture.
    pub(crate) profiles_path: Utf8PathBuf,
    /// Requested feed size.
    pub(crate) total: usize,
    /// Seed override, when the caller wants a reproducible feed.
    pub(crate) seed: Option<u64>,
}

impl FeedConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        Self::require_existing(&self.markets_path, ARG_FEED_MARKETS)?;
        Self::require_existing(&self.tags_path, ARG_FEED_TAGS)?;
        Self::require_existing(&self.profiles_path, ARG_FEED_PROFILES)?;
        Ok(())
    }

    fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
        if path.is_file() {
            Ok(())
        } else {
            Err(CliError::MissingSourceFile {
                field,
                path: path.to_path_buf(),
            })
        }
    }
}

impl TryFrom<FeedArgs> for FeedConfig {
    type Error = CliError;

    fn try_from(args: FeedArgs) -> Result<Self, Self::Error> {
        let key = args.key.ok_or(CliError::MissingArgument {
            field: ARG_FEED_KEY,
            env: ENV_FEED_KEY,
        })?;

        let data_dir = args.data_dir.unwrap_or_else(|| Utf8PathBuf::from("."));
        let markets_path = args
            .markets
            .unwrap_or_else(|| data_dir.join("markets.json"));
        let tags_path = args.tags.unwrap_or_else(|| data_dir.join("tags.json"));
        let profiles_path = args
            .profiles
            .unwrap_or_else(|| data_dir.join("profiles.json"));

        Ok(Self {
            key,
            markets_path,
            tags_path,
            profiles_path,
            total: args.total.unwrap_or(DEFAULT_TOTAL),
            seed: args.seed,
        })
    }
}

/// Fixture data loaded for one invocation.
struct Fixtures {
    markets: Vec<Market>,
    catalog: InMemoryTagCatalog,
    profiles: InMemoryProfileStore,
    ranks: TrendingRanks,
}

pub(crate) fn run_compose(args: FeedArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = resolve_config(args)?;
    execute_compose(&config, writer)
}

pub(crate) fn run_inspect(args: FeedArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = resolve_config(args)?;
    execute_inspect(&config, writer)
}

fn execute_compose(config: &FeedConfig, writer: &mut dyn Write) -> Result<(), CliError> {
    let fixtures = load_fixtures(config)?;
    let feed = compose_feed(config, &fixtures)?;
    write_json(writer, &feed)
}

fn execute_inspect(config: &FeedConfig, writer: &mut dyn Write) -> Result<(), CliError> {
    if config.key == GUEST_KEY {
        return Err(CliError::GuestNotExplainable);
    }
    let fixtures = load_fixtures(config)?;
    let profile = lookup_profile(config, &fixtures)?;
    let composer = FeedComposer::with_defaults();
    let composed = composer.compose_explained(&personalized_request(config, &fixtures, &profile));
    let explanation = composed
        .explanation
        .ok_or(CliError::GuestNotExplainable)?;
    write_json(writer, &explanation)
}

fn resolve_config(args: FeedArgs) -> Result<FeedConfig, CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    Ok(config)
}

fn compose_feed(config: &FeedConfig, fixtures: &Fixtures) -> Result<PersonalizedFeed, CliError> {
    let composer = FeedComposer::with_defaults();
    if config.key == GUEST_KEY {
        return Ok(composer.compose_guest(&GuestRequest {
            markets: &fixtures.markets,
            ranks: &fixtures.ranks,
            total: config.total,
            now: Utc::now(),
        }));
    }
    let profile = lookup_profile(config, fixtures)?;
    Ok(composer.compose(&personalized_request(config, fixtures, &profile)))
}

fn lookup_profile(config: &FeedConfig, fixtures: &Fixtures) -> Result<UserProfile, CliError> {
    fixtures
        .profiles
        .profile(&config.key)
        .ok_or_else(|| CliError::UnknownProfile {
            key: config.key.clone(),
        })
}

fn personalized_request<'a>(
    config: &'a FeedConfig,
    fixtures: &'a Fixtures,
    profile: &'a UserProfile,
) -> ComposeRequest<'a> {
    ComposeRequest {
        key: config.key.as_str(),
        profile,
        markets: &fixtures.markets,
        tags: &fixtures.catalog,
        ranks: &fixtures.ranks,
        total: config.total,
        seed: config.seed.unwrap_or_else(rand::random),
        now: Utc::now(),
    }
}

fn load_fixtures(config: &FeedConfig) -> Result<Fixtures, CliError> {
    let markets: Vec<Market> = load_json(&config.markets_path)?;
    let tag_entries: HashMap<String, MarketTags> = load_json(&config.tags_path)?;
    let profiles: Vec<UserProfile> = load_json(&config.profiles_path)?;
    let ranks = TrendingRanks::from_engagement(&markets);
    Ok(Fixtures {
        catalog: InMemoryTagCatalog::from_entries(tag_entries),
        profiles: InMemoryProfileStore::from_profiles(profiles),
        markets,
        ranks,
    })
}

fn load_json<T: DeserializeOwned>(path: &Utf8Path) -> Result<T, CliError> {
    let file = File::open(path.as_std_path()).map_err(|source| CliError::ReadFixture {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader).map_err(|source| CliError::ParseFixture {
        path: path.to_path_buf(),
        source,
    })
}

fn write_json<T: Serialize>(writer: &mut dyn Write, payload: &T) -> Result<(), CliError> {
    let rendered =
        serde_json::to_string_pretty(payload).map_err(CliError::SerializeOutput)?;
    writer
        .write_all(rendered.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}
