pub mod frame_export;
