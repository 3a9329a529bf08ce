pub use super::settings::Entity as Settings;
