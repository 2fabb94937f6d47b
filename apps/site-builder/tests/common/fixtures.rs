//! Sample quiz sources.

/// Well-formed quiz with an explicit answer, a checkmark answer and a
/// true/false question answered by phrase.
pub const NETWORKING: &str = "\
# Quiz: Networking Basics

Answers are at the end of each question.

### Question 1 (Multiple Choice)
Which layer does IP operate on?

- [ ] A. Transport
- [ ] B. Network
- [ ] C. Session

<details>
<summary>Show Answer</summary>

**Correct Answers:** B
IP is a network layer protocol.
</details>

---

### Question 2 (Multi-Select)
Which protocols use TCP?

- [ ] A. HTTP
- [ ] B. DNS over UDP
- [ ] C. SSH

<details>
<summary>Show Answer</summary>

✅ A. HTTP
✅ C. SSH
</details>

---

### Question 3 (True/False)
UDP guarantees delivery.

- [ ] A. True
- [ ] B. False

<details>
<summary>Show Answer</summary>

B is correct. UDP makes no delivery promise.
</details>
";

/// No heading, one unanswered question and a numbering gap.
pub const SLOPPY: &str = "\
### Question 1 (True/False)
Rust has a garbage collector.
- [ ] True
- [ ] False

### Question 3 (multiple choice)
Pick the borrow checker's job.
- [ ] A. Enforce ownership rules
- [ ] B. Allocate memory

<details>
✅ A. Enforce ownership rules
</details>
";

/// Prose with no question sections.
pub const NOT_A_QUIZ: &str = "# Meeting notes\n\nNothing to see here.\n";

/// First question leaves a code fence open.
pub const UNCLOSED_FENCE: &str = "\
### Question 1 (Multiple Choice)
What does this print?
```rust
println!(\"{}\", 1 + 1);
- [ ] A. 2
- [ ] B. 11

### Question 2 (True/False)
Rust has null.
- [ ] A. True
- [ ] B. False
<details>
**Correct Answers:** B
</details>
";
