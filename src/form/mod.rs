// 表单模块 - 录入校验与写入编排
pub mod controller;
pub mod fields;

pub use controller::FormController;
pub use fields::{NewTradeForm, UpdateForm};
