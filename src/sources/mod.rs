pub mod yahoo;

pub use yahoo::YahooFinanceClient;
