mod token;

pub use token::TokenStore;
pub use token::TokenStoreError;
