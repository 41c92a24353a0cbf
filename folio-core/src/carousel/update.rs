use super::engine::CarouselEngine;
use super::messages::CarouselMessage;
use super::scheduler::Scheduler;

pub fn update<S: Scheduler>(
    engine: &mut CarouselEngine<S>,
    msg: CarouselMessage,
) {
    match msg {
        CarouselMessage::PointerDown { x } => engine.pointer_down(x),
        CarouselMessage::PointerMove { x } => engine.pointer_move(x),
        CarouselMessage::PointerUp => engine.pointer_up(),
        CarouselMessage::PointerLeave => engine.pointer_leave(),
        CarouselMessage::TouchStart { x } => engine.touch_start(x),
        CarouselMessage::TouchMove { x } => engine.touch_move(x),
        CarouselMessage::TouchEnd => engine.touch_end(),
        CarouselMessage::AutoAdvance(ticket) => engine.on_auto_advance(ticket),
        CarouselMessage::Frame(ticket) => engine.on_frame(ticket),
        CarouselMessage::ItemsReplaced(items) => engine.set_items(items),
        CarouselMessage::Resized { viewport_width } => {
            engine.resize(viewport_width)
        }
    }
}
