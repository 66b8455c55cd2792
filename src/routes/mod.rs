pub mod analytics;
pub mod creators;
pub mod health;
pub mod influencers;
pub mod openapi;
pub mod websocket;
