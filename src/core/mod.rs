pub mod calendar;
pub mod contact;
pub mod conversation;
pub mod dates;
pub mod labels;
pub mod message;
pub mod overlay;
pub mod quote;
pub mod session;
pub mod task;
pub mod time_of_day;
pub mod views;
pub mod workspace;
