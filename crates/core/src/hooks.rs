use crate::{EventBus, Feature, ProgressionPort, PurchaseReceipt};

/// Observer run after every successful purchase in any shop.
pub trait PurchaseHook {
    fn id(&self) -> &'static str;
    fn on_purchase(
        &mut self,
        receipt: &PurchaseReceipt,
        progression: &mut dyn ProgressionPort,
        events: &mut EventBus,
    );
}

/// Owning the heal-on-purchase upgrade heals the cube after every purchase.
#[derive(Debug, Default)]
pub struct HealOnPurchaseHook;

impl PurchaseHook for HealOnPurchaseHook {
    fn id(&self) -> &'static str {
        "heal_on_purchase"
    }

    fn on_purchase(
        &mut self,
        _receipt: &PurchaseReceipt,
        progression: &mut dyn ProgressionPort,
        events: &mut EventBus,
    ) {
        if progression.is_unlocked(Feature::HealOnPurchase) {
            progression.heal_cube(events);
        }
    }
}

#[derive(Default)]
pub struct HookRegistry {
    hooks: Vec<Box<dyn PurchaseHook>>,
}

impl std::fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ids: Vec<&str> = self.hooks.iter().map(|hook| hook.id()).collect();
        f.debug_struct("HookRegistry").field("hooks", &ids).finish()
    }
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(HealOnPurchaseHook));
        registry
    }

    /// Hooks run in registration order.
    pub fn register(&mut self, hook: Box<dyn PurchaseHook>) {
        self.hooks.push(hook);
    }

    pub fn invoke(
        &mut self,
        receipt: &PurchaseReceipt,
        progression: &mut dyn ProgressionPort,
        events: &mut EventBus,
    ) {
        for hook in self.hooks.iter_mut() {
            hook.on_purchase(receipt, progression, events);
        }
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}
