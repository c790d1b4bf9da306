pub mod app;
pub mod config;
pub mod sim;

pub use app::{
    draw_drag_icon, run_app, AppError, FrameSurface, InputAction, LoopConfig, LoopMetricsSnapshot,
    Renderer, Rgba, Surface, CLEAR_COLOR,
};
pub use config::{
    load_loop_config, resolve_loop_config, validate_loop_config, ConfigError, CONFIG_ENV_VAR,
};
pub use sim::{
    same_entity, Commands, CollisionSubscription, DragPayload, DragState, Engine, Entity,
    EntityRef, Grid, GridCell, GridRect, KeySubscription, PointerEvent, PointerEventName,
    PointerKind, PointerSubscription, Screen, ScreenState, SpriteBox, Subscription, Tag,
    TimerSubscription, Vec2,
};
pub use winit::keyboard::KeyCode;
