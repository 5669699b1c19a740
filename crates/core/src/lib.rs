pub mod config;
pub mod listing;
pub mod metrics;
pub mod seed;
pub mod testing;
pub mod ticket;

pub use config::{
    load_config, load_config_from_env, load_config_from_str, validate_config, CacheConfig,
    Config, ConfigError, DatabaseConfig, InvalidationMode, SeedConfig, ServerConfig,
};
pub use listing::{ListingCacheConfig, Page, PageKey, PageRequest, TicketListingCache};
pub use seed::{parse_sample_tickets, seed_from_file, SeedError, SeedOutcome};
pub use ticket::{
    CreateTicketRequest, ImportedTicket, SqliteTicketStore, Ticket, TicketError, TicketStatus,
    TicketStore,
};
