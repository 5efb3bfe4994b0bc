// Pure presentation helpers. Nothing here touches the terminal or the network;
// the widgets turn these results into ratatui spans.

pub mod diagram;
pub mod entities;
pub mod help;
pub mod languages;
pub mod pos;
pub mod svg;
