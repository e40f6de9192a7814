pub mod hint_panel;
pub mod priority_table;
pub mod prompt_panel;
