/*!
Transactional push-pull FRP signals.

Discrete value-bearing nodes form a directed graph; [`Input`]s push changes
from the boundary, derived nodes translate them, and [`Output`]s invoke
callbacks with settled values. Changes travel as two-phase transactions
(`Begin`, then `End(v)` or `Cancel`), which lets combining nodes coalesce the
several notifications a single assignment produces across a diamond-shaped
graph into exactly one downstream notification. Every node also answers
pull-mode queries through [`LatestValue`], so new subscribers are primed with
current state synchronously.

# Basic usage

```rust
use ripple_signals::{combine, Input};

let price = Input::new(10.0_f64);
let quantity = Input::new(2.0_f64);
let total = combine(&price.signal(), &quantity.signal(), |p, q| p * q);

let seen = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
let sink = seen.clone();
let _output = total.output(move |v| sink.borrow_mut().push(v));
assert_eq!(*seen.borrow(), vec![20.0]); // primed with the current total

price.set(12.5);
assert_eq!(*seen.borrow(), vec![20.0, 25.0]); // one notification per assignment
```

Propagation is single-threaded and synchronous; the only asynchrony is the
throttle operator's timer, delivered through a caller-supplied [`Scheduler`]
that must invoke tasks back on the engine thread.
*/

pub mod broadcast;
pub mod keyed_set;
pub mod porcelain;
pub mod receiver;
pub mod scheduler;
pub mod signal;
pub mod transaction;

pub use broadcast::{Broadcast, ObserverFn};
pub use keyed_set::KeyedSet;
pub use porcelain::not;
pub use receiver::{Output, Receiver, WillOutput};
pub use scheduler::{Clock, Scheduler, TimerHandle};
pub use signal::{combine, combine3, combine4, combine5, combine6, union, Input, Signal, SignalNode};
pub use transaction::{LatestValue, Transaction};
