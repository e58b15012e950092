//! Demo programs loaded into the editor when no source file is given
//!
//! Both programs keep an `instances` registry and call `log_step` after every
//! interesting line. `log_step` snapshots only the instances of the kind
//! being visualized, which is why the core never filters by type itself.

use crate::model::StructureKind;

/// Linked-list demo: two lists, nine logged steps
pub const LIST_SAMPLE: &str = r#"execution_log = []
instances = {}

class Node:
    def __init__(self, val):
        self.val = val
        self.next = None

class LinkedList:
    def __init__(self):
        self.head = None

    def append(self, val):
        if not self.head:
            self.head = Node(val)
            return
        curr = self.head
        while curr.next:
            curr = curr.next
        curr.next = Node(val)

    def remove(self, val):
        prev = None
        curr = self.head
        while curr:
            if curr.val == val:
                if prev:
                    prev.next = curr.next
                else:
                    self.head = curr.next
                return
            prev = curr
            curr = curr.next

    def to_list(self):
        res = []
        curr = self.head
        while curr:
            res.append(curr.val)
            curr = curr.next
        return res

def log_step(line_num, code_line, action=""):
    step_data = {
        'line': line_num,
        'code': code_line.strip(),
        'action': action,
        'instances': {}
    }
    for name, obj in instances.items():
        if isinstance(obj, LinkedList):
            step_data['instances'][name] = obj.to_list()
    execution_log.append(step_data)

ll = LinkedList()
instances['ll'] = ll
log_step(1, "ll = LinkedList()", "Created LinkedList 'll'")

ll.append(10)
log_step(2, "ll.append(10)", "Appended 10 to 'll'")

ll.append(20)
log_step(3, "ll.append(20)", "Appended 20 to 'll'")

sl = LinkedList()
instances['sl'] = sl
log_step(4, "sl = LinkedList()", "Created LinkedList 'sl'")

sl.append(100)
log_step(5, "sl.append(100)", "Appended 100 to 'sl'")

ll.append(30)
log_step(6, "ll.append(30)", "Appended 30 to 'll'")

ll.remove(20)
log_step(7, "ll.remove(20)", "Removed 20 from 'll'")

sl.append(200)
log_step(8, "sl.append(200)", "Appended 200 to 'sl'")

ll.append(40)
log_step(9, "ll.append(40)", "Appended 40 to 'll'")
"#;

/// Stack demo: two stacks, ten logged steps
pub const STACK_SAMPLE: &str = r#"execution_log = []
instances = {}

class Stack:
    def __init__(self):
        self.items = []

    def push(self, item):
        self.items.append(item)

    def pop(self):
        if self.items:
            return self.items.pop()
        return None

    def peek(self):
        if self.items:
            return self.items[-1]
        return None

    def is_empty(self):
        return len(self.items) == 0

    def size(self):
        return len(self.items)

    def to_list(self):
        return self.items.copy()

def log_step(line_num, code_line, action=""):
    step_data = {
        'line': line_num,
        'code': code_line.strip(),
        'action': action,
        'instances': {}
    }
    for name, obj in instances.items():
        if isinstance(obj, Stack):
            step_data['instances'][name] = obj.to_list()
    execution_log.append(step_data)

s1 = Stack()
instances['s1'] = s1
log_step(1, "s1 = Stack()", "Created Stack 's1'")

s1.push(10)
log_step(2, "s1.push(10)", "Pushed 10 to 's1'")

s1.push(20)
log_step(3, "s1.push(20)", "Pushed 20 to 's1'")

s2 = Stack()
instances['s2'] = s2
log_step(4, "s2 = Stack()", "Created Stack 's2'")

s2.push(100)
log_step(5, "s2.push(100)", "Pushed 100 to 's2'")

s1.push(30)
log_step(6, "s1.push(30)", "Pushed 30 to 's1'")

s1.pop()
log_step(7, "s1.pop()", "Popped from 's1'")

s2.push(200)
log_step(8, "s2.push(200)", "Pushed 200 to 's2'")

s1.push(40)
log_step(9, "s1.push(40)", "Pushed 40 to 's1'")

s2.pop()
log_step(10, "s2.pop()", "Popped from 's2'")
"#;

/// Demo program for a structure kind
pub fn sample_source(kind: StructureKind) -> &'static str {
    match kind {
        StructureKind::List => LIST_SAMPLE,
        StructureKind::Stack => STACK_SAMPLE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_samples_record_a_log() {
        for kind in [StructureKind::List, StructureKind::Stack] {
            let source = sample_source(kind);
            assert!(source.starts_with("execution_log = []"));
            assert!(source.contains(&format!("isinstance(obj, {})", kind.class_name())));
        }
    }

    #[test]
    fn test_step_counts() {
        assert_eq!(LIST_SAMPLE.matches("\nlog_step(").count(), 9);
        assert_eq!(STACK_SAMPLE.matches("\nlog_step(").count(), 10);
    }
}
