pub mod formatter;

pub use formatter::{
    format_bloc_line, format_bloc_stats, format_bloc_table, format_breakdown, format_pagination,
    format_performance, format_score, format_session_count, format_session_header,
    format_session_stats, format_session_table, should_use_colors, ScoredBloc, SessionRow,
};
