//! # chat-service
//!
//! Application layer containing business logic, services, and DTOs.

pub mod dto;
pub mod services;

pub use dto::{EditMessageRequest, NewMessageRequest};
pub use services::{
    ChatService, FriendshipService, NotificationService, ServiceContext, ServiceContextBuilder,
    ServiceError, ServiceResult,
};
