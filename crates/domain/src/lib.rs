//! Entities and the entity service for the restaurant back-office.
//!
//! This crate provides:
//! - The stored entities (tables, menus, foods, orders, order items, invoices)
//!   with their creation and partial-update payloads
//! - Validation of those payloads
//! - [`EntityService`] for create/get/update over any document store

pub mod entities;
pub mod error;
pub mod service;

pub use entities::{
    Food, FoodPatch, Invoice, InvoicePatch, LineItemInput, Menu, MenuPatch, NewFood, NewInvoice,
    NewMenu, NewOrder, NewOrderItem, NewOrderItems, NewTable, Order, OrderItem, OrderItemPatch,
    OrderPatch, PaymentMethod, PaymentStatus, Table, TablePatch, validate_window,
};
pub use error::{DomainError, Result, ValidationError};
pub use service::EntityService;
