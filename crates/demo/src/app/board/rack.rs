use std::cell::RefCell;
use std::rc::Rc;

use grid_engine::{
    Engine, Entity, EntityRef, GridRect, PointerEventName, PointerSubscription, Rgba, Surface,
    Vec2,
};
use tracing::info;

const RACK_BOUNDS: GridRect = GridRect::new(10.0, 10.0, 30.0, 8.0);
const SLOT_COUNT: usize = 4;
const SLOT_STRIDE: f32 = 7.0;
const SLOT_SIZE: (f32, f32) = (5.0, 4.0);
const TOKEN_ROW: f32 = 30.0;
const TOKEN_SIZE: f32 = 4.0;
const TOKEN_COLORS: [Rgba; 3] = [[230, 80, 60, 255], [60, 160, 230, 255], [240, 200, 40, 255]];

const RACK_COLOR: Rgba = [70, 74, 86, 255];
const SLOT_COLOR: Rgba = [40, 42, 50, 255];
const SLOT_HIGHLIGHT: Rgba = [120, 220, 140, 255];
const PLACED_ALPHA: u8 = 70;

pub(crate) struct Token {
    pub(crate) bounds: GridRect,
    pub(crate) color: Rgba,
    pub(crate) placed: bool,
}

impl Token {
    fn new(x: f32, color: Rgba) -> Self {
        Self {
            bounds: GridRect::new(x, TOKEN_ROW, TOKEN_SIZE, TOKEN_SIZE),
            color,
            placed: false,
        }
    }
}

impl Entity for Token {
    fn bounds(&self) -> GridRect {
        self.bounds
    }

    fn is_draggable(&self) -> bool {
        !self.placed
    }

    fn render(&self, surface: &mut dyn Surface) {
        let mut color = self.color;
        if self.placed {
            color[3] = PLACED_ALPHA;
        }
        surface.fill_rect(self.bounds, color);
    }
}

/// What a token hands to the slot it is dropped on.
pub(crate) struct TokenDrop {
    color: Rgba,
    token: Rc<RefCell<Token>>,
}

/// Drop target nested inside the rack; bounds are rack-local.
pub(crate) struct Slot {
    pub(crate) local: GridRect,
    pub(crate) occupant: Option<Rgba>,
    pub(crate) highlighted: bool,
}

impl Slot {
    fn draw_at(&self, origin: Vec2, surface: &mut dyn Surface) {
        let rect = GridRect::new(
            origin.x + self.local.x,
            origin.y + self.local.y,
            self.local.w,
            self.local.h,
        );
        let fill = if self.highlighted {
            SLOT_HIGHLIGHT
        } else {
            SLOT_COLOR
        };
        surface.fill_rect(rect, fill);
        if let Some(color) = self.occupant {
            let inset = GridRect::new(rect.x + 1.0, rect.y + 1.0, rect.w - 2.0, rect.h - 2.0);
            surface.fill_rect(inset, color);
        }
    }
}

impl Entity for Slot {
    fn bounds(&self) -> GridRect {
        self.local
    }
}

pub(crate) struct SlotRack {
    bounds: GridRect,
    slots: Vec<Rc<RefCell<Slot>>>,
}

impl Entity for SlotRack {
    fn bounds(&self) -> GridRect {
        self.bounds
    }

    fn child_at(&self, local: Vec2) -> Option<EntityRef> {
        self.slots
            .iter()
            .find(|slot| slot.borrow().local.contains_point(local))
            .map(|slot| -> EntityRef { slot.clone() })
    }

    fn render(&self, surface: &mut dyn Surface) {
        surface.fill_rect(self.bounds, RACK_COLOR);
        for slot in &self.slots {
            slot.borrow().draw_at(self.bounds.origin(), surface);
        }
    }
}

pub(crate) struct Rack {
    pub(crate) slots: Vec<Rc<RefCell<Slot>>>,
    pub(crate) tokens: Vec<Rc<RefCell<Token>>>,
}

pub(crate) fn install(engine: &mut Engine) -> Rack {
    let slots: Vec<Rc<RefCell<Slot>>> = (0..SLOT_COUNT)
        .map(|index| {
            Rc::new(RefCell::new(Slot {
                local: GridRect::new(
                    2.0 + index as f32 * SLOT_STRIDE,
                    2.0,
                    SLOT_SIZE.0,
                    SLOT_SIZE.1,
                ),
                occupant: None,
                highlighted: false,
            }))
        })
        .collect();
    engine.add_entity(Rc::new(RefCell::new(SlotRack {
        bounds: RACK_BOUNDS,
        slots: slots.clone(),
    })));
    for slot in &slots {
        subscribe_slot(engine, slot);
    }

    let tokens: Vec<Rc<RefCell<Token>>> = TOKEN_COLORS
        .iter()
        .enumerate()
        .map(|(index, color)| {
            Rc::new(RefCell::new(Token::new(
                RACK_BOUNDS.x + 2.0 + index as f32 * 8.0,
                *color,
            )))
        })
        .collect();
    for token in &tokens {
        engine.add_entity(token.clone());
        subscribe_token(engine, token);
    }

    Rack { slots, tokens }
}

fn subscribe_token(engine: &mut Engine, token: &Rc<RefCell<Token>>) {
    let source = token.clone();
    engine.add_pointer_subscription(PointerSubscription::new(
        PointerEventName::DragStart,
        token.clone(),
        move |_, payload, _| {
            let color = source.borrow().color;
            payload.set(TokenDrop {
                color,
                token: source.clone(),
            });
        },
    ));
}

fn subscribe_slot(engine: &mut Engine, slot: &Rc<RefCell<Slot>>) {
    let target = slot.clone();
    engine.add_pointer_subscription(PointerSubscription::new(
        PointerEventName::DragIn,
        slot.clone(),
        move |_, payload, _| {
            let mut slot = target.borrow_mut();
            slot.highlighted = slot.occupant.is_none() && payload.get::<TokenDrop>().is_some();
        },
    ));

    let target = slot.clone();
    engine.add_pointer_subscription(PointerSubscription::new(
        PointerEventName::DragOut,
        slot.clone(),
        move |_, _, _| target.borrow_mut().highlighted = false,
    ));

    let target = slot.clone();
    engine.add_pointer_subscription(PointerSubscription::new(
        PointerEventName::DragEnd,
        slot.clone(),
        move |local, payload, _| {
            let mut slot = target.borrow_mut();
            slot.highlighted = false;
            if slot.occupant.is_some() {
                return;
            }
            if let Some(dropped) = payload.take::<TokenDrop>() {
                slot.occupant = Some(dropped.color);
                dropped.token.borrow_mut().placed = true;
                info!(local_x = local.x, local_y = local.y, "token_placed");
            }
        },
    ));
}
