pub mod cap_table_pipeline;
