pub mod rates_client;

pub use rates_client::{
    HttpRateProvider, ProviderError, RateProvider, DEFAULT_ENDPOINTS, DEFAULT_TIMEOUT,
};
