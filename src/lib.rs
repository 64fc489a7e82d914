pub mod demo_feed;
pub mod fixture_cache;
pub mod football_api;
pub mod h2h_stats;
pub mod league_cache;
pub mod normalize;
pub mod provider;
pub mod starred;
pub mod state;
pub mod storage;
