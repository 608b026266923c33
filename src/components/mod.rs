/// Statement list with per-edge editing.
pub mod edge_list;
/// Canvas drawing of the query graph.
pub mod force_graph;
/// Search result listing.
pub mod results;
/// Editing buttons and inputs.
pub mod toolbar;
/// Triple file load and save.
pub mod triple_panel;
