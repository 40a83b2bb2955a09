pub mod cache;
pub mod price_oracle;
pub mod token;
