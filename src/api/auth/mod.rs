mod token;

pub use token::TenantAccessToken;
