use parking_lot::Mutex;

/// Número de secuencia de una petición emitida para un [`Latest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

impl Ticket {
    pub fn seq(self) -> u64 {
        self.0
    }
}

#[derive(Debug)]
struct Slot<T> {
    issued: u64,
    value: T,
}

/// Celda "la última petición gana".
///
/// Cada carga emite un [`Ticket`] monotónicamente creciente; la respuesta sólo
/// se aplica si su ticket sigue siendo el último emitido para esta celda.
/// `invalidate` también avanza la secuencia, así que un reset descarta las
/// respuestas en vuelo. El lock nunca se mantiene a través de un `.await`.
#[derive(Debug)]
pub struct Latest<T> {
    slot: Mutex<Slot<T>>,
}

impl<T> Latest<T> {
    pub fn new(value: T) -> Self {
        Self { slot: Mutex::new(Slot { issued: 0, value }) }
    }

    /// Emite un ticket nuevo y aplica `f` (normalmente el estado "cargando").
    pub fn issue(&self, f: impl FnOnce(&mut T)) -> Ticket {
        let mut slot = self.slot.lock();
        slot.issued += 1;
        f(&mut slot.value);
        Ticket(slot.issued)
    }

    /// Descarta cualquier petición en vuelo y aplica `f`.
    pub fn invalidate(&self, f: impl FnOnce(&mut T)) {
        let mut slot = self.slot.lock();
        slot.issued += 1;
        f(&mut slot.value);
    }

    /// Aplica `f` sólo si `ticket` es el último emitido. Devuelve si se aplicó.
    pub fn apply(&self, ticket: Ticket, f: impl FnOnce(&mut T)) -> bool {
        let mut slot = self.slot.lock();
        if slot.issued != ticket.0 {
            return false;
        }
        f(&mut slot.value);
        true
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.slot.lock().issued == ticket.0
    }

    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.slot.lock().value)
    }

    /// Edición del usuario (p. ej. elegir una opción); no toca la secuencia.
    pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        f(&mut self.slot.lock().value)
    }
}

impl<T: Clone> Latest<T> {
    pub fn snapshot(&self) -> T {
        self.slot.lock().value.clone()
    }
}
