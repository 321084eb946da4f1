pub mod channel_chart;
pub mod color_value_card;
pub mod color_value_item;
pub mod report_view;
pub mod sidebar;
pub mod status_badge;
pub mod trial_tables;
