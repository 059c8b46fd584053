// core/src/models/mod.rs

//! Data structures representing database entities.

pub mod access_token;
pub mod brand;
pub mod cart;
pub mod cart_line;
pub mod category;
pub mod favorite;
pub mod product;
pub mod product_image;
pub mod review;
pub mod user;

// Re-export the model structs for convenient access
pub use access_token::AccessToken;
pub use brand::Brand;
pub use cart::Cart;
pub use cart_line::{CartLine, NewCartLine};
pub use category::Category;
pub use favorite::Favorite;
pub use product::Product;
pub use product_image::ProductImage;
pub use review::{NewReview, Review};
pub use user::{NewUser, User, UserRole};
