//! Checkout Session

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::{
        Mutex, MutexGuard,
        atomic::{AtomicBool, Ordering},
    },
};

use jiff::Timestamp;
use tracing::{info, warn};

use crate::{
    cart::{CartHandle, CartStore},
    checkout::{
        AddressId, CheckoutContext, CheckoutError, CheckoutStep, PaymentMethod, StepStatus,
        UserId, progress,
    },
    orders::{OrderId, OrderRecord, OrderStatus},
    pricing::OrderTotals,
};

#[derive(Debug)]
struct SessionState {
    step: CheckoutStep,
    address: Option<AddressId>,
    payment: Option<PaymentMethod>,
    order_id: Option<OrderId>,
}

/// One attempt at checking out the current cart.
///
/// Selections and step changes are made by the checkout surface. Totals are always
/// derived from the live cart and never cached. Dropping the session abandons it
/// without touching the cart.
pub struct CheckoutSession {
    context: CheckoutContext,
    cart: CartHandle,
    user: UserId,
    state: Mutex<SessionState>,
    submitting: AtomicBool,
}

impl Debug for CheckoutSession {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("CheckoutSession")
            .field("user", &self.user)
            .field("state", &self.state)
            .field("submitting", &self.submitting)
            .finish_non_exhaustive()
    }
}

impl CheckoutSession {
    /// Start checking out `cart`, at the address step.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::Unauthenticated`]: nobody is signed in. Checked first.
    /// - [`CheckoutError::EmptyCart`]: the cart has no lines.
    pub fn begin(context: &CheckoutContext, cart: CartHandle) -> Result<Self, CheckoutError> {
        let user = context
            .identity
            .current_user()
            .ok_or(CheckoutError::Unauthenticated)?;

        if cart.read(CartStore::is_empty)? {
            return Err(CheckoutError::EmptyCart);
        }

        info!(user_id = %user, "checkout started");

        Ok(Self {
            context: context.clone(),
            cart,
            user,
            state: Mutex::new(SessionState {
                step: CheckoutStep::Address,
                address: None,
                payment: None,
                order_id: None,
            }),
            submitting: AtomicBool::new(false),
        })
    }

    /// Current step.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::Poisoned`] if the session state is unusable.
    pub fn step(&self) -> Result<CheckoutStep, CheckoutError> {
        Ok(self.lock()?.step)
    }

    /// Status of every step, for progress displays.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::Poisoned`] if the session state is unusable.
    pub fn progress(&self) -> Result<[(CheckoutStep, StepStatus); 4], CheckoutError> {
        Ok(progress(self.step()?))
    }

    /// The customer checking out.
    pub fn user(&self) -> &UserId {
        &self.user
    }

    /// Address chosen so far.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::Poisoned`] if the session state is unusable.
    pub fn selected_address(&self) -> Result<Option<AddressId>, CheckoutError> {
        Ok(self.lock()?.address.clone())
    }

    /// Payment method chosen so far.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::Poisoned`] if the session state is unusable.
    pub fn selected_payment_method(&self) -> Result<Option<PaymentMethod>, CheckoutError> {
        Ok(self.lock()?.payment)
    }

    /// Id of the placed order, once the session has reached [`CheckoutStep::Confirm`].
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::Poisoned`] if the session state is unusable.
    pub fn order_id(&self) -> Result<Option<OrderId>, CheckoutError> {
        Ok(self.lock()?.order_id.clone())
    }

    /// True while an order submission is in flight.
    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::Acquire)
    }

    /// Choose the delivery address.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::InvalidStep`]: the order has already been placed.
    /// - [`CheckoutError::SubmissionInProgress`]: the order is being placed.
    pub fn select_address(&self, address: AddressId) -> Result<(), CheckoutError> {
        let mut state = self.lock_editable()?;

        state.address = Some(address);

        Ok(())
    }

    /// Choose the payment method.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::InvalidStep`]: the order has already been placed.
    /// - [`CheckoutError::SubmissionInProgress`]: the order is being placed.
    pub fn select_payment_method(&self, method: PaymentMethod) -> Result<(), CheckoutError> {
        let mut state = self.lock_editable()?;

        state.payment = Some(method);

        Ok(())
    }

    /// Complete the current step and move to the next one.
    ///
    /// Only the address and payment steps can be completed this way; the review step
    /// is completed by [`CheckoutSession::place_order`].
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::MissingAddress`]: leaving the address step without an address.
    /// - [`CheckoutError::MissingPaymentMethod`]: leaving the payment step without a method.
    /// - [`CheckoutError::InvalidStep`]: the session is at review or confirm.
    /// - [`CheckoutError::SubmissionInProgress`]: the order is being placed.
    pub fn advance(&self) -> Result<CheckoutStep, CheckoutError> {
        let mut state = self.lock_editable()?;

        let next = match state.step {
            CheckoutStep::Address if state.address.is_none() => {
                return Err(CheckoutError::MissingAddress);
            }
            CheckoutStep::Payment if state.payment.is_none() => {
                return Err(CheckoutError::MissingPaymentMethod);
            }
            CheckoutStep::Address => CheckoutStep::Payment,
            CheckoutStep::Payment => CheckoutStep::Review,
            step @ (CheckoutStep::Review | CheckoutStep::Confirm) => {
                return Err(CheckoutError::InvalidStep(step));
            }
        };

        state.step = next;

        info!(step = %next, "checkout advanced");

        Ok(next)
    }

    /// Go back to an earlier step, forgetting the choices made from that step on.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::InvalidStep`]: `step` is not an earlier address or payment
    ///   step, or the order has already been placed.
    /// - [`CheckoutError::SubmissionInProgress`]: the order is being placed.
    pub fn restart_from(&self, step: CheckoutStep) -> Result<(), CheckoutError> {
        let mut state = self.lock_editable()?;

        match step {
            CheckoutStep::Address if step <= state.step => {
                state.address = None;
                state.payment = None;
            }
            CheckoutStep::Payment if step <= state.step => {
                state.payment = None;
            }
            _ => return Err(CheckoutError::InvalidStep(step)),
        }

        state.step = step;

        info!(step = %step, "checkout restarted");

        Ok(())
    }

    /// Totals for the cart as it is now.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be read or its totals overflow.
    pub fn totals(&self) -> Result<OrderTotals, CheckoutError> {
        let subtotal = self.cart.read(CartStore::subtotal)??;

        Ok(self.context.pricing.totals(subtotal)?)
    }

    /// Place the order from the review step.
    ///
    /// On success the cart is cleared and the session moves to
    /// [`CheckoutStep::Confirm`]. On failure the session stays at review with the cart
    /// untouched, and the customer may try again.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::SubmissionInProgress`]: another call is already placing the order.
    /// - [`CheckoutError::InvalidStep`]: the session is not at the review step.
    /// - [`CheckoutError::EmptyCart`]: the cart was emptied during checkout.
    /// - [`CheckoutError::UnknownAddress`]: the chosen address no longer resolves.
    /// - [`CheckoutError::OrderSubmissionFailed`]: the order service failed.
    #[tracing::instrument(
        name = "checkout.place_order",
        skip_all,
        fields(user_id = %self.user, order_id = tracing::field::Empty)
    )]
    pub async fn place_order(&self) -> Result<OrderId, CheckoutError> {
        let _submission =
            SubmissionGuard::acquire(&self.submitting).ok_or(CheckoutError::SubmissionInProgress)?;

        let order = self.assemble_order()?;

        let order_id = self
            .context
            .orders
            .submit_order(order)
            .await
            .map_err(|error| {
                warn!(%error, "order submission failed");

                CheckoutError::OrderSubmissionFailed(error)
            })?;

        // The order exists now, so a failed clear must not undo the confirmation.
        if let Err(error) = self.cart.write(CartStore::clear) {
            warn!(%error, "order placed but the cart could not be cleared");
        }

        {
            let mut state = self.lock()?;

            state.step = CheckoutStep::Confirm;
            state.order_id = Some(order_id.clone());
        }

        tracing::Span::current().record("order_id", tracing::field::display(&order_id));
        info!("order placed");

        Ok(order_id)
    }

    fn assemble_order(&self) -> Result<OrderRecord, CheckoutError> {
        let (address_id, payment_method) = {
            let state = self.lock()?;

            if state.step != CheckoutStep::Review {
                return Err(CheckoutError::InvalidStep(state.step));
            }

            let address = state.address.clone().ok_or(CheckoutError::MissingAddress)?;
            let payment = state.payment.ok_or(CheckoutError::MissingPaymentMethod)?;

            (address, payment)
        };

        let shipping_address = self
            .context
            .addresses
            .address(&address_id)?
            .ok_or(CheckoutError::UnknownAddress(address_id))?;

        let (lines, subtotal) = self
            .cart
            .read(|cart| cart.subtotal().map(|subtotal| (cart.lines().to_vec(), subtotal)))??;

        if lines.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        Ok(OrderRecord {
            user_id: self.user.clone(),
            lines,
            totals: self.context.pricing.totals(subtotal)?,
            shipping_address,
            payment_method,
            status: OrderStatus::Pending,
            created_at: Timestamp::now(),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, SessionState>, CheckoutError> {
        self.state.lock().map_err(|_err| CheckoutError::Poisoned)
    }

    /// Lock the state for a change made by the customer before the order is placed.
    ///
    /// The in-flight flag is checked under the state lock, so an edit either lands
    /// before the order snapshot is taken or is rejected.
    fn lock_editable(&self) -> Result<MutexGuard<'_, SessionState>, CheckoutError> {
        let state = self.lock()?;

        if self.is_submitting() {
            return Err(CheckoutError::SubmissionInProgress);
        }

        if state.step.is_terminal() {
            return Err(CheckoutError::InvalidStep(state.step));
        }

        Ok(state)
    }
}

/// Marks a submission as in flight until dropped.
struct SubmissionGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> SubmissionGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for SubmissionGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
