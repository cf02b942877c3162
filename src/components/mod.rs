//! UI components: the graph canvas, the detail panel, the legend, and the view composing them.

pub mod detail_panel;
pub mod force_graph;
pub mod graph_view;
pub mod legend;
